#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard driver.
//!
//! A [`Dashboard`] owns the shared [`IncidentStore`], the chart settings and
//! a [`ChartRenderer`]. [`Dashboard::draw_all`] starts every requested chart
//! at once; the first one to need data triggers the single dataset load and
//! the rest wait on it. Each chart succeeds or fails on its own, so a
//! rendering error in one chart never stops the others.

pub mod config;
pub mod render;

use std::sync::Arc;

use crime_dash_aggregate::{CountMode, Dimension, GroupKey, Grouping, rollup_by};
use crime_dash_analytics::{ChartSettings, compute};
use crime_dash_analytics_models::ChartKind;
use crime_dash_source::{IncidentStore, ProgressCallback, StoreError};

pub use config::{ConfigError, DashboardConfig};
pub use render::{ChartRenderer, JsonFileRenderer, RenderError, StdoutRenderer};

/// Errors that can stop a single chart.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The dataset could not be loaded.
    #[error(transparent)]
    Load(#[from] StoreError),

    /// The chart was computed but could not be output.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// A rollup was requested with the wrong number of dimensions.
    #[error("Expected one to three grouping dimensions, got {count}")]
    Grouping {
        /// Number of dimensions given.
        count: usize,
    },
}

/// Result of drawing one chart.
#[derive(Debug)]
pub struct ChartOutcome {
    /// The chart.
    pub kind: ChartKind,
    /// Number of records rendered, or why the chart failed.
    pub result: Result<usize, DashboardError>,
}

impl ChartOutcome {
    /// Whether the chart was rendered.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Computes and renders charts from one shared dataset.
pub struct Dashboard {
    store: Arc<IncidentStore>,
    settings: ChartSettings,
    renderer: Arc<dyn ChartRenderer>,
}

impl Dashboard {
    /// Creates a dashboard over `store`.
    #[must_use]
    pub fn new(
        store: Arc<IncidentStore>,
        settings: ChartSettings,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        Self {
            store,
            settings,
            renderer,
        }
    }

    /// Loads the dataset if needed, computes one chart and renders it.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Load`] if the dataset failed to load and
    /// [`DashboardError::Render`] if the renderer failed.
    pub async fn draw(&self, kind: ChartKind) -> Result<usize, DashboardError> {
        let snapshot = self.store.snapshot().await?;
        let data = compute(kind, &snapshot, &self.settings);
        self.renderer.render(kind, &data)?;
        Ok(data.record_count())
    }

    /// Draws every chart in `kinds` concurrently and reports each outcome,
    /// in the order of `kinds`.
    pub async fn draw_all(
        &self,
        kinds: &[ChartKind],
        progress: &Arc<dyn ProgressCallback>,
    ) -> Vec<ChartOutcome> {
        progress.set_total(kinds.len() as u64);

        let draws = kinds.iter().map(|&kind| async move {
            progress.set_message(format!("Rendering {kind}"));
            let result = self.draw(kind).await;
            match &result {
                Ok(records) => log::info!("Rendered {kind} ({records} records)"),
                Err(e) => log::error!("Chart {kind} failed: {e}"),
            }
            progress.inc(1);
            ChartOutcome { kind, result }
        });

        futures::future::join_all(draws).await
    }

    /// Counts incidents grouped by one to three dimensions, sorted by key.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Grouping`] for an empty list or more than
    /// three dimensions, and [`DashboardError::Load`] if the dataset failed
    /// to load.
    pub async fn rollup(
        &self,
        dimensions: &[Dimension],
        mode: CountMode,
    ) -> Result<Vec<(GroupKey, u64)>, DashboardError> {
        let grouping = Grouping::from_dimensions(dimensions).ok_or(DashboardError::Grouping {
            count: dimensions.len(),
        })?;
        let snapshot = self.store.snapshot().await?;
        Ok(rollup_by(snapshot.iter(), grouping, &mode).sorted_by_key())
    }
}

/// Number of failed charts in `outcomes`.
#[must_use]
pub fn failures(outcomes: &[ChartOutcome]) -> usize {
    outcomes.iter().filter(|o| !o.is_ok()).count()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crime_dash_aggregate::KeyValue;
    use crime_dash_analytics_models::{ChartData, DistrictRate};
    use crime_dash_source::{CsvFileSource, null_progress};

    use super::*;

    /// Keeps rendered charts in memory, optionally failing one kind.
    #[derive(Default)]
    struct RecordingRenderer {
        rendered: Mutex<Vec<ChartData>>,
        fail_on: Option<ChartKind>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, kind: ChartKind, data: &ChartData) -> Result<(), RenderError> {
            if self.fail_on == Some(kind) {
                return Err(RenderError::Io(std::io::Error::other("disk full")));
            }
            self.rendered.lock().unwrap().push(data.clone());
            Ok(())
        }
    }

    fn write_csv(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(
            &path,
            "ID,Date,Primary Type,Arrest,Domestic,District,Latitude,Longitude,Year\n\
             1,01/05/2020 10:30:00 PM,THEFT,True,false,5,41.8,-87.6,2020\n\
             2,01/06/2020 01:00:00 AM,THEFT,False,false,5,41.9,-87.7,2020\n\
             3,02/01/2020 09:15:00 AM,BATTERY,TRUE,true,7,41.7,-87.5,2020\n",
        )
        .unwrap();
        path
    }

    fn dashboard(path: &std::path::Path, renderer: Arc<RecordingRenderer>) -> Dashboard {
        let store = Arc::new(IncidentStore::new(Arc::new(CsvFileSource::new(path))));
        Dashboard::new(store, ChartSettings::default(), renderer)
    }

    #[tokio::test]
    async fn renders_district_rates_from_csv() {
        let path = write_csv("crime_dash_dashboard_rates.csv");
        let renderer = Arc::new(RecordingRenderer::default());
        let dash = dashboard(&path, renderer.clone());

        let records = dash.draw(ChartKind::ArrestRateByDistrict).await.unwrap();
        assert_eq!(records, 2);

        let rendered = renderer.rendered.lock().unwrap();
        assert_eq!(
            rendered[0],
            ChartData::ArrestRateByDistrict(vec![
                DistrictRate { district: 7, rate: 100.0 },
                DistrictRate { district: 5, rate: 50.0 },
            ])
        );
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn every_chart_renders_once() {
        let path = write_csv("crime_dash_dashboard_all.csv");
        let renderer = Arc::new(RecordingRenderer::default());
        let dash = dashboard(&path, renderer.clone());

        let outcomes = dash.draw_all(ChartKind::all(), &null_progress()).await;

        assert_eq!(failures(&outcomes), 0);
        let kinds: Vec<ChartKind> = outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, ChartKind::all());
        assert_eq!(renderer.rendered.lock().unwrap().len(), ChartKind::all().len());
        std::fs::remove_file(&path).ok();
    }

    #[derive(Default)]
    struct RecordingProgress {
        total: Mutex<u64>,
        done: Mutex<u64>,
        messages: Mutex<Vec<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn set_total(&self, total: u64) {
            *self.total.lock().unwrap() = total;
        }

        fn inc(&self, delta: u64) {
            *self.done.lock().unwrap() += delta;
        }

        fn set_message(&self, msg: String) {
            self.messages.lock().unwrap().push(msg);
        }

        fn finish(&self, _msg: String) {}
    }

    #[tokio::test]
    async fn progress_tracks_each_chart() {
        let path = write_csv("crime_dash_dashboard_progress.csv");
        let dash = dashboard(&path, Arc::new(RecordingRenderer::default()));
        let recording = Arc::new(RecordingProgress::default());
        let progress: Arc<dyn ProgressCallback> = recording.clone();

        let kinds = [ChartKind::CrimeTypes, ChartKind::HourlyFrequency];
        dash.draw_all(&kinds, &progress).await;

        assert_eq!(*recording.total.lock().unwrap(), 2);
        assert_eq!(*recording.done.lock().unwrap(), 2);
        assert_eq!(
            *recording.messages.lock().unwrap(),
            ["Rendering crime-types", "Rendering hourly-frequency"]
        );
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn render_failure_is_isolated() {
        let path = write_csv("crime_dash_dashboard_isolated.csv");
        let renderer = Arc::new(RecordingRenderer {
            fail_on: Some(ChartKind::CrimeHeatmap),
            ..RecordingRenderer::default()
        });
        let dash = dashboard(&path, renderer.clone());

        let kinds = [ChartKind::CrimeTypes, ChartKind::CrimeHeatmap, ChartKind::HourlyFrequency];
        let outcomes = dash.draw_all(&kinds, &null_progress()).await;

        assert_eq!(failures(&outcomes), 1);
        assert!(matches!(outcomes[1].result, Err(DashboardError::Render(_))));
        assert_eq!(renderer.rendered.lock().unwrap().len(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn load_failure_fails_every_chart() {
        let missing = std::env::temp_dir().join("crime_dash_dashboard_missing.csv");
        let renderer = Arc::new(RecordingRenderer::default());
        let dash = dashboard(&missing, renderer.clone());

        let outcomes = dash.draw_all(ChartKind::all(), &null_progress()).await;

        assert_eq!(failures(&outcomes), ChartKind::all().len());
        assert!(
            outcomes
                .iter()
                .all(|o| matches!(o.result, Err(DashboardError::Load(_))))
        );
        assert!(renderer.rendered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rollup_groups_by_requested_dimensions() {
        let path = write_csv("crime_dash_dashboard_rollup.csv");
        let dash = dashboard(&path, Arc::new(RecordingRenderer::default()));

        let rows = dash
            .rollup(&[Dimension::District, Dimension::Arrest], CountMode::Rows)
            .await
            .unwrap();
        let keys: Vec<String> = rows.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["5 / false", "5 / true", "7 / true"]);
        assert_eq!(rows[0].0.parts()[0], KeyValue::Int(5));

        let err = dash.rollup(&[], CountMode::Rows).await.unwrap_err();
        assert!(matches!(err, DashboardError::Grouping { count: 0 }));
        std::fs::remove_file(&path).ok();
    }
}
