//! Load-once incident snapshot shared by every chart.
//!
//! The first caller of [`IncidentStore::snapshot`] fetches and normalizes the
//! dataset; every concurrent or later caller awaits that same load and gets
//! the same outcome. A failed load is remembered too, so a broken source is
//! reported to each waiting chart instead of being fetched again.

use std::sync::Arc;

use crime_dash_incident_models::Incident;
use tokio::sync::OnceCell;

use crate::normalize::normalize_all;
use crate::{IncidentSource, SourceError};

/// Immutable, shareable view of the normalized dataset.
pub type Snapshot = Arc<[Incident]>;

/// Error returned by [`IncidentStore::snapshot`] when the one load failed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to load incidents from {source_name}: {error}")]
pub struct StoreError {
    /// Description of the source that failed.
    pub source_name: String,
    /// The underlying failure, shared by every caller.
    pub error: Arc<SourceError>,
}

/// Single-flight, memoizing wrapper around an [`IncidentSource`].
pub struct IncidentStore {
    source: Arc<dyn IncidentSource>,
    loaded: OnceCell<Result<Snapshot, StoreError>>,
}

impl IncidentStore {
    /// Creates a store that will load from `source` on first use.
    #[must_use]
    pub fn new(source: Arc<dyn IncidentSource>) -> Self {
        Self {
            source,
            loaded: OnceCell::new(),
        }
    }

    /// Returns the normalized dataset, loading it on the first call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the load failed. The same error is returned
    /// to every caller for the lifetime of the store.
    pub async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        self.loaded
            .get_or_init(|| self.load())
            .await
            .clone()
    }

    /// Whether the load has completed (successfully or not).
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    async fn load(&self) -> Result<Snapshot, StoreError> {
        let source_name = self.source.describe();
        log::info!("Loading incidents from {source_name}...");

        match self.source.fetch_raw().await {
            Ok(raw) => {
                let incidents = normalize_all(&raw);
                log::info!("Loaded {} incidents from {source_name}", incidents.len());
                Ok(Snapshot::from(incidents))
            }
            Err(e) => {
                log::error!("Failed to load incidents from {source_name}: {e}");
                Err(StoreError {
                    source_name,
                    error: Arc::new(e),
                })
            }
        }
    }
}

impl std::fmt::Debug for IncidentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncidentStore")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use crime_dash_incident_models::RawRecord;

    use super::*;

    /// In-memory source that counts how often it is fetched.
    struct CountingSource {
        rows: Vec<RawRecord>,
        fail: bool,
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn new(rows: Vec<RawRecord>) -> Self {
            Self {
                rows,
                fail: false,
                fetches: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Vec::new())
            }
        }
    }

    #[async_trait]
    impl IncidentSource for CountingSource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        async fn fetch_raw(&self) -> Result<Vec<RawRecord>, SourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail {
                return Err(SourceError::Io(std::io::Error::other("boom")));
            }
            Ok(self.rows.clone())
        }
    }

    fn rows() -> Vec<RawRecord> {
        vec![
            RawRecord::default().with("District", "5").with("Arrest", "True"),
            RawRecord::default().with("District", "7"),
        ]
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_fetch() {
        let source = Arc::new(CountingSource::new(rows()));
        let store = IncidentStore::new(source.clone());

        let (a, b, c) = tokio::join!(store.snapshot(), store.snapshot(), store.snapshot());
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(a.len(), 2);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));

        store.snapshot().await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_shared_and_not_retried() {
        let source = Arc::new(CountingSource::failing());
        let store = IncidentStore::new(source.clone());

        let (a, b) = tokio::join!(store.snapshot(), store.snapshot());
        let a = a.unwrap_err();
        let b = b.unwrap_err();
        assert!(Arc::ptr_eq(&a.error, &b.error));
        assert_eq!(a.source_name, "memory");

        assert!(store.snapshot().await.is_err());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn snapshot_is_normalized() {
        let store = IncidentStore::new(Arc::new(CountingSource::new(rows())));
        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot[0].district, Some(5));
        assert!(snapshot[0].arrest);
        assert!(!snapshot[1].arrest);
    }
}
