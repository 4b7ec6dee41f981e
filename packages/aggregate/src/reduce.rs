//! The closed set of group reducers.
//!
//! Every rollup reduces each group of incidents with one of the types here.
//! The [`Reduce`] trait is sealed: call sites pick a reducer explicitly
//! instead of passing arbitrary callbacks.

use std::collections::HashSet;

use crime_dash_incident_models::Incident;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

mod sealed {
    pub trait Sealed {}
}

/// Reduces one group of incidents to an aggregate value.
pub trait Reduce: sealed::Sealed {
    /// Aggregate produced for each group.
    type Output;

    /// Reduces a non-empty group.
    fn reduce(&self, group: &[&Incident]) -> Self::Output;
}

/// Number of records in the group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Count;

impl sealed::Sealed for Count {}

impl Reduce for Count {
    type Output = u64;

    fn reduce(&self, group: &[&Incident]) -> u64 {
        group.len() as u64
    }
}

/// Number of distinct incident IDs in the group, so an incident that appears
/// on several rows is counted once. Rows without an ID each count as their
/// own incident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniqueCount;

impl sealed::Sealed for UniqueCount {}

impl Reduce for UniqueCount {
    type Output = u64;

    fn reduce(&self, group: &[&Incident]) -> u64 {
        let mut seen = HashSet::with_capacity(group.len());
        let mut anonymous = 0u64;
        for incident in group {
            if incident.id.is_empty() {
                anonymous += 1;
            } else {
                seen.insert(incident.id.as_str());
            }
        }
        seen.len() as u64 + anonymous
    }
}

/// How a bucketed count treats repeated incident IDs.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CountMode {
    /// Every row counts.
    #[default]
    Rows,
    /// Each distinct incident ID counts once.
    UniqueIds,
}

impl sealed::Sealed for CountMode {}

impl Reduce for CountMode {
    type Output = u64;

    fn reduce(&self, group: &[&Incident]) -> u64 {
        match self {
            Self::Rows => Count.reduce(group),
            Self::UniqueIds => UniqueCount.reduce(group),
        }
    }
}

/// A boolean attribute of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Flag {
    /// An arrest was made.
    Arrest,
    /// The incident was domestic.
    Domestic,
}

impl Flag {
    /// Value of this flag on `incident`.
    #[must_use]
    pub const fn of(self, incident: &Incident) -> bool {
        match self {
            Self::Arrest => incident.arrest,
            Self::Domestic => incident.domestic,
        }
    }
}

/// An optional numeric attribute of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Measure {
    /// Latitude (WGS84).
    Latitude,
    /// Longitude (WGS84).
    Longitude,
}

impl Measure {
    /// Value of this measure on `incident`.
    #[must_use]
    pub const fn of(self, incident: &Incident) -> Option<f64> {
        match self {
            Self::Latitude => incident.latitude,
            Self::Longitude => incident.longitude,
        }
    }
}

/// Arithmetic mean of a measure over the records that have it. `None` when
/// no record in the group has the measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mean(pub Measure);

impl sealed::Sealed for Mean {}

impl Reduce for Mean {
    type Output = Option<f64>;

    #[allow(clippy::cast_precision_loss)]
    fn reduce(&self, group: &[&Incident]) -> Option<f64> {
        let (sum, n) = group
            .iter()
            .filter_map(|i| self.0.of(i))
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        (n > 0).then(|| sum / n as f64)
    }
}

/// Percentage (0-100) of the group that has a flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate(pub Flag);

impl sealed::Sealed for Rate {}

impl Reduce for Rate {
    type Output = Option<f64>;

    fn reduce(&self, group: &[&Incident]) -> Option<f64> {
        Tally(self.0).reduce(group).rate()
    }
}

/// Group size together with how many records have a flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally(pub Flag);

/// Output of [`Tally`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagTally {
    /// Records in the group.
    pub total: u64,
    /// Records with the flag set.
    pub flagged: u64,
}

impl FlagTally {
    /// `flagged` as a percentage of `total`; `None` for an empty tally.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rate(self) -> Option<f64> {
        (self.total > 0).then(|| 100.0 * self.flagged as f64 / self.total as f64)
    }
}

impl sealed::Sealed for Tally {}

impl Reduce for Tally {
    type Output = FlagTally;

    fn reduce(&self, group: &[&Incident]) -> FlagTally {
        FlagTally {
            total: group.len() as u64,
            flagged: group.iter().filter(|i| self.0.of(i)).count() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_id(id: &str) -> Incident {
        Incident {
            id: id.to_string(),
            ..Incident::default()
        }
    }

    #[test]
    fn unique_count_collapses_repeated_ids() {
        let rows = [with_id("1"), with_id("1"), with_id("2"), with_id(""), with_id("")];
        let group: Vec<&Incident> = rows.iter().collect();
        assert_eq!(Count.reduce(&group), 5);
        assert_eq!(UniqueCount.reduce(&group), 4);
        assert_eq!(CountMode::Rows.reduce(&group), 5);
        assert_eq!(CountMode::UniqueIds.reduce(&group), 4);
    }

    #[test]
    fn mean_ignores_missing_measures() {
        let rows = [
            Incident {
                latitude: Some(41.0),
                ..Incident::default()
            },
            Incident {
                latitude: Some(43.0),
                ..Incident::default()
            },
            Incident::default(),
        ];
        let group: Vec<&Incident> = rows.iter().collect();
        assert_eq!(Mean(Measure::Latitude).reduce(&group), Some(42.0));
        assert_eq!(Mean(Measure::Longitude).reduce(&group), None);
    }

    #[test]
    fn tally_and_rate_agree() {
        let rows = [
            Incident {
                arrest: true,
                ..Incident::default()
            },
            Incident::default(),
            Incident::default(),
            Incident {
                arrest: true,
                domestic: true,
                ..Incident::default()
            },
        ];
        let group: Vec<&Incident> = rows.iter().collect();
        let tally = Tally(Flag::Arrest).reduce(&group);
        assert_eq!(tally, FlagTally { total: 4, flagged: 2 });
        assert_eq!(Rate(Flag::Arrest).reduce(&group), Some(50.0));
        assert_eq!(Rate(Flag::Domestic).reduce(&group), Some(25.0));
    }

    #[test]
    fn empty_tally_has_no_rate() {
        assert_eq!(FlagTally::default().rate(), None);
        assert_eq!(Rate(Flag::Arrest).reduce(&[]), None);
    }

    #[test]
    fn count_mode_parses_from_kebab_case() {
        assert_eq!("unique-ids".parse::<CountMode>().unwrap(), CountMode::UniqueIds);
        assert_eq!(CountMode::Rows.to_string(), "rows");
    }
}
