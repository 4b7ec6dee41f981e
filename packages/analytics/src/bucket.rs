//! Counts over a repeating calendar period, gap-filled so every slot of the
//! period is present.

use crime_dash_aggregate::{CountMode, hours, months, rollup};
use crime_dash_incident_models::Incident;

/// Count per hour of day, exactly 24 entries starting at hour 0.
#[must_use]
pub fn by_hour(incidents: &[Incident], mode: CountMode) -> Vec<(u32, u64)> {
    rollup(incidents, Incident::hour, &mode).fill(&hours())
}

/// Count per zero-based month, exactly 12 entries starting at January.
#[must_use]
pub fn by_month(incidents: &[Incident], mode: CountMode) -> Vec<(u32, u64)> {
    rollup(incidents, Incident::month, &mode).fill(&months())
}
