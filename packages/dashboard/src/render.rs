//! Where finished chart data goes.
//!
//! Renderers only see the serialized record shape; layout and drawing
//! happen elsewhere.

use std::io::Write as _;
use std::path::PathBuf;

use crime_dash_analytics_models::{ChartData, ChartKind};

/// Errors that can occur while writing chart output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the chart failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Receives each chart once its data is computed.
pub trait ChartRenderer: Send + Sync {
    /// Outputs one chart.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the chart cannot be written.
    fn render(&self, kind: ChartKind, data: &ChartData) -> Result<(), RenderError>;
}

/// Writes each chart to `<dir>/<chart-id>.json` as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonFileRenderer {
    dir: PathBuf,
}

impl JsonFileRenderer {
    /// Creates a renderer writing into `dir`. The directory is created on
    /// first render.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File the given chart is written to.
    #[must_use]
    pub fn path_for(&self, kind: ChartKind) -> PathBuf {
        self.dir.join(format!("{kind}.json"))
    }
}

impl ChartRenderer for JsonFileRenderer {
    fn render(&self, kind: ChartKind, data: &ChartData) -> Result<(), RenderError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(kind);
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&path, json)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Prints each chart to standard output as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutRenderer;

impl ChartRenderer for StdoutRenderer {
    fn render(&self, _kind: ChartKind, data: &ChartData) -> Result<(), RenderError> {
        let json = serde_json::to_string_pretty(data)?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{json}")?;
        Ok(())
    }
}
