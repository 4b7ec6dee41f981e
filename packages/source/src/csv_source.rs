//! CSV-backed incident sources.
//!
//! Both sources read the whole dataset in one go: [`CsvFileSource`] from a
//! local file and [`CsvUrlSource`] with a single HTTP GET. Rows are
//! deserialized by header name into [`RawRecord`], so column order does not
//! matter and extra columns are ignored.

use std::io::Read;
use std::path::PathBuf;

use async_trait::async_trait;
use crime_dash_incident_models::RawRecord;

use crate::{IncidentSource, SourceError};

/// Parses CSV text (with a header row) into raw records.
///
/// A field that is not valid UTF-8 is read as empty, so it ends up absent
/// after normalization while the rest of its row is kept. Rows that still
/// cannot be deserialized are skipped.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the input cannot be read at all.
pub fn read_raw_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut headers: csv::StringRecord = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    headers.trim();

    let mut records = Vec::new();
    let mut skipped = 0u64;
    for result in reader.byte_records() {
        let row: csv::StringRecord = result?
            .iter()
            .map(|field| std::str::from_utf8(field).unwrap_or_default())
            .collect();
        match row.deserialize::<RawRecord>(Some(&headers)) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::trace!("  skipping malformed row: {e}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed CSV rows");
    }

    Ok(records)
}

/// Reads the dataset from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

}

#[async_trait]
impl IncidentSource for CsvFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_raw(&self) -> Result<Vec<RawRecord>, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        log::debug!("Read {} bytes from {}", bytes.len(), self.path.display());
        read_raw_records(bytes.as_slice())
    }
}

/// Downloads the dataset as CSV over HTTP.
#[derive(Debug, Clone)]
pub struct CsvUrlSource {
    url: String,
    client: reqwest::Client,
}

impl CsvUrlSource {
    /// Creates a source downloading from `url` with a default client.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    /// Creates a source downloading from `url` with the given client.
    #[must_use]
    pub fn with_client(url: &str, client: reqwest::Client) -> Self {
        Self {
            url: url.to_owned(),
            client,
        }
    }
}

#[async_trait]
impl IncidentSource for CsvUrlSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch_raw(&self) -> Result<Vec<RawRecord>, SourceError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        log::debug!("Downloaded {} bytes from {}", bytes.len(), self.url);

        read_raw_records(&bytes[..])
    }
}
