//! Field-level parsers for raw incident text.
//!
//! Every parser is total: bad input maps to `None` (or `false` for flags),
//! never to a panic or an error, and never to a made-up zero.

use chrono::NaiveDateTime;

/// Timestamp format the dashboard dataset publishes (`03/14/2021 11:05:00 PM`).
pub const INCIDENT_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Parses an incident timestamp.
///
/// Accepts the dataset's `MM/DD/YYYY hh:mm:ss AM|PM` form first, then falls
/// back to the ISO-8601 form used by the Socrata export of the same data
/// (with or without fractional seconds).
#[must_use]
pub fn parse_incident_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, INCIDENT_DATE_FORMAT) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Parses a `"true"`/`"false"` flag, ignoring case and surrounding
/// whitespace. Anything other than `true` is `false`.
#[must_use]
pub fn parse_flag(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("true")
}

/// Parses a finite floating point number. Empty, non-numeric, `NaN` and
/// infinite input all yield `None`.
#[must_use]
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an integral identifier such as a district or year.
///
/// The dataset sometimes writes these as floats (`"5.0"`), so anything that
/// parses as a finite number with no fractional part and fits in `i32` is
/// accepted.
#[must_use]
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
pub fn parse_integer(s: &str) -> Option<i32> {
    if let Ok(v) = s.trim().parse::<i32>() {
        return Some(v);
    }
    let v = parse_number(s)?;
    if v.fract() != 0.0 || v < f64::from(i32::MIN) || v > f64::from(i32::MAX) {
        return None;
    }
    Some(v as i32)
}

/// Trims a free-text field, mapping blank text to `None`.
#[must_use]
pub fn parse_label(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}
