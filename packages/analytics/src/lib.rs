#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived metrics and per-chart computations for the crime dashboard.
//!
//! The metric modules ([`rate`], [`rank`], [`pivot`], [`trend`],
//! [`bucket`]) turn rollups from `crime_dash_aggregate` into the numbers a
//! chart plots. [`charts`] wires them into one function per
//! [`ChartKind`], each taking the incident snapshot and returning
//! [`ChartData`].

pub mod bucket;
pub mod charts;
pub mod pivot;
pub mod rank;
pub mod rate;
pub mod settings;
pub mod trend;

pub use charts::compute;
pub use crime_dash_analytics_models::{ChartData, ChartKind};
pub use settings::ChartSettings;
