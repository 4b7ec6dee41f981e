//! Dashboard configuration.
//!
//! Settings come from, in increasing precedence: the TOML embedded in the
//! binary, an optional user TOML file, the `CRIME_DASH_SOURCE` and
//! `CRIME_DASH_OUTPUT_DIR` environment variables, and command-line flags.

use std::path::{Path, PathBuf};

use crime_dash_analytics::ChartSettings;
use crime_dash_analytics_models::ChartKind;
use serde::{Deserialize, Serialize};

/// Configuration used when no file is given.
pub const DEFAULT_CONFIG: &str = include_str!("../dashboard.toml");

/// Environment variable overriding [`DashboardConfig::source`].
pub const SOURCE_ENV: &str = "CRIME_DASH_SOURCE";

/// Environment variable overriding [`DashboardConfig::output_dir`].
pub const OUTPUT_DIR_ENV: &str = "CRIME_DASH_OUTPUT_DIR";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// The values parsed but are inconsistent.
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}

/// Everything the dashboard run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// CSV path or http(s) URL of the incident dataset.
    pub source: String,
    /// Directory the JSON renderer writes into.
    pub output_dir: PathBuf,
    /// Charts to render. Empty means all of them.
    #[serde(default)]
    pub charts: Vec<ChartKind>,
    /// Chart tunables.
    #[serde(default)]
    pub settings: ChartSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: "data/crimes.csv".to_string(),
            output_dir: PathBuf::from("dashboard"),
            charts: Vec::new(),
            settings: ChartSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed input and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the embedded default when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::debug!("Reading config from {}", path.display());
                Self::parse(&std::fs::read_to_string(path)?)
            }
            None => Self::parse(DEFAULT_CONFIG),
        }
    }

    /// Applies `CRIME_DASH_SOURCE` and `CRIME_DASH_OUTPUT_DIR` when set.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(SOURCE_ENV).ok(),
            std::env::var(OUTPUT_DIR_ENV).ok().map(PathBuf::from),
        );
    }

    /// Replaces the source and output directory with whichever overrides
    /// are present. Blank sources are ignored.
    pub fn apply_overrides(&mut self, source: Option<String>, output_dir: Option<PathBuf>) {
        if let Some(source) = source.filter(|s| !s.trim().is_empty()) {
            self.source = source;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
    }

    /// Checks values that parse fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.trim().is_empty() {
            return Err(invalid("source must not be empty"));
        }
        if self.settings.top_n == 0 {
            return Err(invalid("settings.top_n must be at least 1"));
        }
        let (start, end) = self.settings.year_range;
        if start > end {
            return Err(invalid(format!(
                "settings.year_range starts after it ends ({start} > {end})"
            )));
        }
        Ok(())
    }

    /// Charts to render, in configured order without duplicates. Every
    /// chart when none are configured.
    #[must_use]
    pub fn enabled_charts(&self) -> Vec<ChartKind> {
        if self.charts.is_empty() {
            return ChartKind::all().to_vec();
        }
        let mut charts = Vec::with_capacity(self.charts.len());
        for kind in &self.charts {
            if !charts.contains(kind) {
                charts.push(*kind);
            }
        }
        charts
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use crime_dash_aggregate::CountMode;

    use super::*;

    #[test]
    fn embedded_default_parses() {
        let config = DashboardConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.settings.hourly_count_mode, CountMode::UniqueIds);
        assert_eq!(config.enabled_charts().len(), ChartKind::all().len());
    }

    #[test]
    fn partial_settings_keep_defaults() {
        let config = DashboardConfig::parse(
            r#"
            source = "https://example.com/crimes.csv"
            output_dir = "out"
            charts = ["crime-types", "crime-heatmap", "crime-types"]

            [settings]
            top_n = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.settings.top_n, 5);
        assert_eq!(config.settings.year_range, (2015, 2024));
        assert_eq!(
            config.enabled_charts(),
            vec![ChartKind::CrimeTypes, ChartKind::CrimeHeatmap]
        );
    }

    #[test]
    fn unknown_chart_is_rejected() {
        let err = DashboardConfig::parse(
            r#"
            source = "a.csv"
            output_dir = "out"
            charts = ["pie-of-everything"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn inverted_year_range_is_invalid() {
        let err = DashboardConfig::parse(
            r#"
            source = "a.csv"
            output_dir = "out"

            [settings]
            year_range = [2024, 2015]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn zero_top_n_is_invalid() {
        let config = DashboardConfig {
            settings: ChartSettings {
                top_n: 0,
                ..ChartSettings::default()
            },
            ..DashboardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_replace_only_what_is_given() {
        let mut config = DashboardConfig::default();
        config.apply_overrides(Some("https://example.com/x.csv".to_string()), None);
        assert_eq!(config.source, "https://example.com/x.csv");
        assert_eq!(config.output_dir, PathBuf::from("dashboard"));

        config.apply_overrides(Some("   ".to_string()), Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.source, "https://example.com/x.csv");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn loads_user_file() {
        let path = std::env::temp_dir().join("crime_dash_config_test.toml");
        std::fs::write(&path, "source = \"file.csv\"\noutput_dir = \"charts\"\n").unwrap();
        let config = DashboardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.source, "file.csv");
        assert_eq!(config.settings, ChartSettings::default());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("crime_dash_no_such_config.toml");
        let err = DashboardConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
