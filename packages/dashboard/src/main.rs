#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime dashboard.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use crime_dash_aggregate::{CountMode, Dimension};
use crime_dash_analytics_models::ChartKind;
use crime_dash_cli_utils::IndicatifProgress;
use crime_dash_dashboard::{
    ChartRenderer, Dashboard, DashboardConfig, JsonFileRenderer, StdoutRenderer, failures,
};
use crime_dash_source::{IncidentStore, ProgressCallback as _, source_for};

#[derive(Parser)]
#[command(name = "crime_dash", about = "Crime statistics dashboard builder")]
struct Cli {
    /// TOML config file (defaults to the built-in config)
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV path or http(s) URL of the dataset (overrides config and `CRIME_DASH_SOURCE`)
    #[arg(long)]
    source: Option<String>,
    /// Directory to write chart JSON into (overrides config and `CRIME_DASH_OUTPUT_DIR`)
    #[arg(long, conflicts_with = "stdout")]
    out: Option<PathBuf>,
    /// Print charts to stdout instead of writing files
    #[arg(long)]
    stdout: bool,
    /// Chart to render (repeatable). Defaults to the configured charts
    #[arg(long = "chart", value_parser = parse_chart)]
    charts: Vec<ChartKind>,
    /// How many categories ranked charts keep
    #[arg(long)]
    top_n: Option<usize>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every chart id
    Charts,
    /// Print incident counts grouped by one to three dimensions
    Rollup {
        /// Dimension to group by (repeatable, outermost first), e.g. `district`
        #[arg(long = "by", required = true, value_parser = parse_dimension)]
        by: Vec<Dimension>,
        /// Count each incident ID once instead of every row
        #[arg(long)]
        unique: bool,
    },
}

fn parse_chart(id: &str) -> Result<ChartKind, String> {
    id.parse()
        .map_err(|_| format!("unknown chart id `{id}` (run `crime_dash charts` for the list)"))
}

fn parse_dimension(name: &str) -> Result<Dimension, String> {
    name.parse().map_err(|_| {
        format!(
            "unknown dimension `{name}` \
             (year, month, hour, district, primary-type, domestic, arrest)"
        )
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_dash_cli_utils::init_logger();
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Charts)) {
        println!("{:<28} TITLE", "ID");
        println!("{}", "-".repeat(60));
        for kind in ChartKind::all() {
            println!("{:<28} {}", kind.to_string(), kind.title());
        }
        return Ok(());
    }

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    config.apply_env();
    config.apply_overrides(cli.source, cli.out);
    if let Some(top_n) = cli.top_n {
        config.settings.top_n = top_n;
    }
    config.validate()?;

    let store = Arc::new(IncidentStore::new(Arc::from(source_for(&config.source))));
    let renderer: Arc<dyn ChartRenderer> = if cli.stdout {
        Arc::new(StdoutRenderer)
    } else {
        Arc::new(JsonFileRenderer::new(&config.output_dir))
    };
    let dashboard = Dashboard::new(store, config.settings, renderer);

    if let Some(Commands::Rollup { by, unique }) = cli.command {
        let mode = if unique {
            CountMode::UniqueIds
        } else {
            CountMode::Rows
        };
        let header = by
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ");
        let rows = dashboard.rollup(&by, mode).await?;
        println!("{header:<40} COUNT");
        println!("{}", "-".repeat(50));
        for (key, count) in rows {
            println!("{:<40} {count}", key.to_string());
        }
        return Ok(());
    }

    let charts = if cli.charts.is_empty() {
        config.enabled_charts()
    } else {
        cli.charts
    };

    let progress = IndicatifProgress::charts_bar(&multi, "Rendering charts");
    let outcomes = dashboard.draw_all(&charts, &progress).await;
    let failed = failures(&outcomes);
    progress.finish(format!("{} of {} charts rendered", outcomes.len() - failed, outcomes.len()));

    if failed > 0 {
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                eprintln!("{}: {e}", outcome.kind);
            }
        }
        return Err(format!("{failed} of {} charts failed", outcomes.len()).into());
    }

    if !cli.stdout {
        log::info!("Charts written to {}", config.output_dir.display());
    }

    Ok(())
}
