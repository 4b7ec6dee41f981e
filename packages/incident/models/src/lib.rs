#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw and normalized crime incident record types.
//!
//! A [`RawRecord`] is one row of the source dataset exactly as it arrived
//! (every field is text, any of them may be missing). The normalizer in
//! `crime_dash_source` turns it into an [`Incident`], which is what every
//! aggregation and chart works from.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Column headers of the source dataset.
pub mod columns {
    /// Incident identifier.
    pub const ID: &str = "ID";
    /// Occurrence timestamp (`MM/DD/YYYY hh:mm:ss AM`).
    pub const DATE: &str = "Date";
    /// Crime type label (e.g. `"THEFT"`).
    pub const PRIMARY_TYPE: &str = "Primary Type";
    /// `"True"` / `"False"`.
    pub const ARREST: &str = "Arrest";
    /// `"True"` / `"False"`.
    pub const DOMESTIC: &str = "Domestic";
    /// Police district number.
    pub const DISTRICT: &str = "District";
    /// WGS84 latitude.
    pub const LATITUDE: &str = "Latitude";
    /// WGS84 longitude.
    pub const LONGITUDE: &str = "Longitude";
    /// Year the incident was recorded under.
    pub const YEAR: &str = "Year";
}

/// One unprocessed row of the incident dataset.
///
/// Field names match the CSV headers so the struct can be deserialized
/// straight from a `csv::Reader`. Columns the dataset does not carry stay
/// `None`; unknown columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "ID", default)]
    pub id: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Primary Type", default)]
    pub primary_type: Option<String>,
    #[serde(rename = "Arrest", default)]
    pub arrest: Option<String>,
    #[serde(rename = "Domestic", default)]
    pub domestic: Option<String>,
    #[serde(rename = "District", default)]
    pub district: Option<String>,
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
}

impl RawRecord {
    /// Sets a field by its dataset column name. Unknown columns are ignored.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let slot = match column {
            columns::ID => &mut self.id,
            columns::DATE => &mut self.date,
            columns::PRIMARY_TYPE => &mut self.primary_type,
            columns::ARREST => &mut self.arrest,
            columns::DOMESTIC => &mut self.domestic,
            columns::DISTRICT => &mut self.district,
            columns::LATITUDE => &mut self.latitude,
            columns::LONGITUDE => &mut self.longitude,
            columns::YEAR => &mut self.year,
            _ => return,
        };
        *slot = Some(value.into());
    }

    /// Builder-style variant of [`RawRecord::set`].
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::default();
        for (column, value) in iter {
            record.set(column.as_ref(), value);
        }
        record
    }
}

/// A crime incident normalized into typed fields.
///
/// Fields the source could not supply (or supplied in an unparseable form)
/// are `None` rather than a sentinel value, so aggregations keyed on them
/// can skip the record instead of grouping it under a bogus key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Source identifier. Empty when the row had none.
    pub id: String,
    /// When the incident occurred.
    pub date: Option<NaiveDateTime>,
    /// Crime type label as published by the source.
    pub primary_type: Option<String>,
    /// Police district.
    pub district: Option<i32>,
    /// Value of the dataset's own `Year` column.
    pub year: Option<i32>,
    /// Whether an arrest was made.
    pub arrest: bool,
    /// Whether the incident was domestic.
    pub domestic: bool,
    /// The row left `Arrest` or `Domestic` blank, so both flags above are
    /// only defaults.
    pub missing_flags: bool,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
}

impl Incident {
    /// Calendar year of [`Incident::date`].
    #[must_use]
    pub fn occurred_year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }

    /// Zero-based month (0 = January) of [`Incident::date`].
    #[must_use]
    pub fn month(&self) -> Option<u32> {
        self.date.map(|d| d.month0())
    }

    /// Hour of day (0-23) of [`Incident::date`].
    #[must_use]
    pub fn hour(&self) -> Option<u32> {
        self.date.map(|d| d.hour())
    }

    /// Both coordinates, if the incident has them.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}
