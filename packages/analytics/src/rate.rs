//! Percentages derived from a pair of count rollups.

use std::hash::Hash;

use crime_dash_aggregate::Rollup;

/// Percentage of `denominator` that `numerator` represents, per key.
///
/// One entry per denominator key with a non-zero total, in the
/// denominator's order. Keys missing from `numerator` count as zero.
/// Numerator keys outside the denominator are ignored.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rate<K: Eq + Hash + Clone>(
    numerator: &Rollup<K, u64>,
    denominator: &Rollup<K, u64>,
) -> Rollup<K, f64> {
    denominator
        .iter()
        .filter(|&(_, &total)| total > 0)
        .map(|(key, &total)| {
            let hits = numerator.get(key).copied().unwrap_or(0);
            (key.clone(), 100.0 * hits as f64 / total as f64)
        })
        .collect()
}

/// [`rate`], ranked from highest to lowest. Equal rates keep the
/// denominator's order.
#[must_use]
pub fn ranked_rate<K: Eq + Hash + Clone>(
    numerator: &Rollup<K, u64>,
    denominator: &Rollup<K, u64>,
) -> Vec<(K, f64)> {
    rate(numerator, denominator).sorted_by(|a, b| b.1.total_cmp(&a.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(i32, u64)]) -> Rollup<i32, u64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn missing_numerator_means_zero() {
        let rates = rate(&counts(&[(5, 1)]), &counts(&[(5, 2), (7, 4)]));
        assert_eq!(rates.get(&5), Some(&50.0));
        assert_eq!(rates.get(&7), Some(&0.0));
    }

    #[test]
    fn zero_denominators_are_omitted() {
        let rates = rate(&counts(&[]), &counts(&[(5, 0), (7, 3)]));
        assert!(!rates.contains_key(&5));
        assert_eq!(rates.len(), 1);
    }

    #[test]
    fn rates_stay_within_bounds() {
        let num = counts(&[(1, 0), (2, 3), (3, 7)]);
        let den = counts(&[(1, 4), (2, 3), (3, 10), (4, 1)]);
        for (_, r) in rate(&num, &den).iter() {
            assert!((0.0..=100.0).contains(r));
        }
    }

    #[test]
    fn ranked_rate_is_descending_and_stable() {
        let num = counts(&[(1, 1), (2, 2), (3, 1)]);
        let den = counts(&[(1, 2), (2, 2), (3, 2)]);
        let ranked = ranked_rate(&num, &den);
        assert_eq!(ranked, vec![(2, 100.0), (1, 50.0), (3, 50.0)]);
    }
}
