//! Raw row to [`Incident`] normalization.

use crime_dash_incident_models::{Incident, RawRecord};

use crate::parsing::{parse_flag, parse_incident_date, parse_integer, parse_label, parse_number};

/// Normalizes one raw row. Never fails; unusable fields become `None`.
#[must_use]
pub fn normalize(raw: &RawRecord) -> Incident {
    Incident {
        id: raw.id.as_deref().map(str::trim).unwrap_or_default().to_owned(),
        date: raw.date.as_deref().and_then(parse_incident_date),
        primary_type: raw.primary_type.as_deref().and_then(parse_label),
        district: raw.district.as_deref().and_then(parse_integer),
        year: raw.year.as_deref().and_then(parse_integer),
        arrest: raw.arrest.as_deref().is_some_and(parse_flag),
        domestic: raw.domestic.as_deref().is_some_and(parse_flag),
        missing_flags: is_blank(raw.arrest.as_deref()) || is_blank(raw.domestic.as_deref()),
        latitude: raw.latitude.as_deref().and_then(parse_number),
        longitude: raw.longitude.as_deref().and_then(parse_number),
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Normalizes a batch of raw rows, logging how many rows are missing the
/// fields most charts key on.
#[must_use]
pub fn normalize_all(raw: &[RawRecord]) -> Vec<Incident> {
    let incidents: Vec<Incident> = raw.iter().map(normalize).collect();

    let undated = incidents.iter().filter(|i| i.date.is_none()).count();
    let no_district = incidents.iter().filter(|i| i.district.is_none()).count();
    let untyped = incidents.iter().filter(|i| i.primary_type.is_none()).count();

    log::debug!(
        "Normalized {} rows ({undated} without a usable date, \
         {no_district} without a district, {untyped} without a primary type)",
        incidents.len()
    );

    incidents
}
