#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident data access and normalization.
//!
//! An [`IncidentSource`] knows how to fetch the raw dataset; the
//! [`normalize`] module turns raw rows into typed incidents; the
//! [`store::IncidentStore`] makes sure the whole thing happens once per
//! process no matter how many charts ask for it at the same time.

pub mod csv_source;
pub mod normalize;
pub mod parsing;
pub mod progress;
pub mod store;

use async_trait::async_trait;
use crime_dash_incident_models::RawRecord;

pub use csv_source::{CsvFileSource, CsvUrlSource};
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use store::{IncidentStore, Snapshot, StoreError};

/// Errors that can occur while fetching the raw dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload was not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Trait every dataset provider implements.
///
/// A source only fetches; it does not normalize or cache. Wrap it in an
/// [`IncidentStore`] to get a memoized, normalized snapshot.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Human-readable description (path or URL) for log messages.
    fn describe(&self) -> String;

    /// Fetches every raw row of the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the dataset cannot be read or parsed.
    async fn fetch_raw(&self) -> Result<Vec<RawRecord>, SourceError>;
}

/// Picks a source implementation for a user-supplied location: `http://` and
/// `https://` locations are downloaded, anything else is treated as a path.
#[must_use]
pub fn source_for(location: &str) -> Box<dyn IncidentSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(CsvUrlSource::new(location))
    } else {
        Box::new(CsvFileSource::new(location))
    }
}
