//! Named grouping dimensions and composite group keys.
//!
//! The typed functions in [`crate::rollup`] take arbitrary key closures.
//! This module covers the other common case: grouping by one to three of
//! the dataset's well-known dimensions chosen at runtime (for example from
//! command-line flags).

use std::hash::Hash;

use crime_dash_incident_models::Incident;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::reduce::Reduce;
use crate::rollup::{Rollup, rollup};

/// A dimension an incident can be grouped by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Dimension {
    /// Calendar year of the occurrence date.
    Year,
    /// Month of the occurrence date (0 = January).
    Month,
    /// Hour of the occurrence date (0-23).
    Hour,
    /// Police district.
    District,
    /// Crime type label.
    PrimaryType,
    /// Domestic flag.
    Domestic,
    /// Arrest flag.
    Arrest,
}

impl Dimension {
    /// Key value of this dimension for `incident`, or `None` when the
    /// incident does not carry it.
    #[must_use]
    pub fn extract(self, incident: &Incident) -> Option<KeyValue> {
        match self {
            Self::Year => incident.occurred_year().map(|y| KeyValue::Int(i64::from(y))),
            Self::Month => incident.month().map(|m| KeyValue::Int(i64::from(m))),
            Self::Hour => incident.hour().map(|h| KeyValue::Int(i64::from(h))),
            Self::District => incident.district.map(|d| KeyValue::Int(i64::from(d))),
            Self::PrimaryType => incident.primary_type.clone().map(KeyValue::Text),
            Self::Domestic => Some(KeyValue::Flag(incident.domestic)),
            Self::Arrest => Some(KeyValue::Flag(incident.arrest)),
        }
    }
}

/// One component of a group key.
///
/// Numeric dimensions compare by value, so district `10` sorts after
/// district `9`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    /// Year, month, hour, or district.
    Int(i64),
    /// Crime type.
    Text(String),
    /// Domestic or arrest flag.
    Flag(bool),
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Flag(v) => write!(f, "{v}"),
        }
    }
}

/// The one to three dimensions a runtime grouping is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Flat grouping by a single dimension.
    One(Dimension),
    /// Composite key of two dimensions.
    Two(Dimension, Dimension),
    /// Composite key of three dimensions.
    Three(Dimension, Dimension, Dimension),
}

impl Grouping {
    /// Builds a grouping from a list of dimensions. Returns `None` unless
    /// the list has between one and three entries.
    #[must_use]
    pub fn from_dimensions(dimensions: &[Dimension]) -> Option<Self> {
        match *dimensions {
            [a] => Some(Self::One(a)),
            [a, b] => Some(Self::Two(a, b)),
            [a, b, c] => Some(Self::Three(a, b, c)),
            _ => None,
        }
    }

    /// The dimensions, outermost first.
    #[must_use]
    pub fn dimensions(self) -> Vec<Dimension> {
        match self {
            Self::One(a) => vec![a],
            Self::Two(a, b) => vec![a, b],
            Self::Three(a, b, c) => vec![a, b, c],
        }
    }

    /// Composite key for `incident`; `None` if any dimension is missing.
    #[must_use]
    pub fn key(self, incident: &Incident) -> Option<GroupKey> {
        self.dimensions()
            .into_iter()
            .map(|d| d.extract(incident))
            .collect::<Option<Vec<_>>>()
            .map(GroupKey)
    }
}

/// A composite key of one to three [`KeyValue`]s, ordered like the
/// [`Grouping`] that produced it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(pub Vec<KeyValue>);

impl GroupKey {
    /// Key components, outermost first.
    #[must_use]
    pub fn parts(&self) -> &[KeyValue] {
        &self.0
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// Flat rollup keyed by a runtime [`Grouping`].
pub fn rollup_by<'a, R: Reduce>(
    records: impl IntoIterator<Item = &'a Incident>,
    grouping: Grouping,
    reducer: &R,
) -> Rollup<GroupKey, R::Output> {
    rollup(records, |i| grouping.key(i), reducer)
}
