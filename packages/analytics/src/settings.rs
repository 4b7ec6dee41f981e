use crime_dash_aggregate::CountMode;
use serde::{Deserialize, Serialize};

/// Tunables shared by every chart computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// How many categories ranked charts keep.
    pub top_n: usize,
    /// Inclusive range of recorded years the yearly trend covers.
    pub year_range: (i32, i32),
    /// Whether the hourly chart counts rows or distinct incident IDs.
    pub hourly_count_mode: CountMode,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            year_range: (2015, 2024),
            hourly_count_mode: CountMode::UniqueIds,
        }
    }
}

impl ChartSettings {
    /// Whether `year` falls inside [`Self::year_range`].
    #[must_use]
    pub const fn in_year_range(&self, year: i32) -> bool {
        year >= self.year_range.0 && year <= self.year_range.1
    }
}
