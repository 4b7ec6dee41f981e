use crime_dash_analytics_models::Trend;

/// Ordinary least-squares fit of `y = slope * x + intercept`.
///
/// Returns [`Trend::Undefined`] for empty input or when every x is the
/// same, since no unique line exists.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linear_trend(points: &[(f64, f64)]) -> Trend {
    if points.is_empty() {
        return Trend::Undefined;
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
        let dx = x - x_mean;
        (dx.mul_add(dx, sxx), dx.mul_add(y - y_mean, sxy))
    });

    if sxx <= 0.0 {
        return Trend::Undefined;
    }

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-x_mean, y_mean);

    if slope.is_finite() && intercept.is_finite() {
        Trend::Defined { slope, intercept }
    } else {
        Trend::Undefined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exact_line() {
        let trend = linear_trend(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        let Trend::Defined { slope, intercept } = trend else {
            panic!("expected a defined trend, got {trend:?}");
        };
        assert!((slope - 2.0).abs() < 1e-9);
        assert!(intercept.abs() < 1e-9);
    }

    #[test]
    fn fits_noisy_points() {
        let trend = linear_trend(&[(0.0, 1.0), (1.0, 2.0), (2.0, 2.0), (3.0, 4.0)]);
        let Trend::Defined { slope, intercept } = trend else {
            panic!("expected a defined trend, got {trend:?}");
        };
        assert!((slope - 0.9).abs() < 1e-9);
        assert!((intercept - 0.9).abs() < 1e-9);
    }

    #[test]
    fn fits_closely_spaced_x() {
        let trend = linear_trend(&[(0.0, 0.0), (1e-8, 1.0), (2e-8, 2.0)]);
        let Trend::Defined { slope, intercept } = trend else {
            panic!("expected a defined trend, got {trend:?}");
        };
        assert!((slope / 1e8 - 1.0).abs() < 1e-6);
        assert!(intercept.abs() < 1e-6);
    }

    #[test]
    fn identical_x_is_undefined() {
        assert_eq!(linear_trend(&[(2.0, 1.0), (2.0, 5.0)]), Trend::Undefined);
        assert_eq!(linear_trend(&[(4.0, 1.0)]), Trend::Undefined);
    }

    #[test]
    fn empty_is_undefined() {
        assert_eq!(linear_trend(&[]), Trend::Undefined);
    }
}
