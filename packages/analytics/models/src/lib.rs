#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart identifiers and chart-ready record shapes.
//!
//! These types are the contract with whatever draws the dashboard: each
//! chart hands over a sequence of plain records, serialized with camelCase
//! field names. Nothing here knows about pixels, scales or colors.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Full month names, indexed by zero-based month.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of a zero-based month, or `"Unknown"` when out of range.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    usize::try_from(month)
        .ok()
        .and_then(|m| MONTH_NAMES.get(m))
        .copied()
        .unwrap_or("Unknown")
}

/// Every chart the dashboard can draw.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ChartKind {
    /// Most frequent crime types.
    CrimeTypes,
    /// Per-month series across years with a trend line per month.
    MonthlyCycle,
    /// Incidents per hour of day.
    HourlyFrequency,
    /// Incidents per calendar month, largest first.
    MonthlyTotals,
    /// Crime type mix per district, stacked.
    CrimeTypeByDistrict,
    /// Arrest rate per crime type.
    ArrestRateByType,
    /// Domestic incidents per district with district centroids.
    DomesticDistrictMap,
    /// Arrest rate per district.
    ArrestRateByDistrict,
    /// Crime type to domestic to arrest flows.
    ArrestFlow,
    /// Domestic cases and arrests per year.
    ArrestsVsDomestic,
    /// Non-domestic cases and arrests per year.
    ArrestsVsNonDomestic,
    /// Yearly totals with a linear trend.
    CrimeTrends,
    /// Year by month grid of distinct incidents.
    CrimeHeatmap,
    /// Crime type mix per year, stacked.
    CrimeTypeByYear,
    /// One small-multiple panel of monthly counts per year.
    MonthlyPanels,
}

impl ChartKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CrimeTypes,
            Self::MonthlyCycle,
            Self::HourlyFrequency,
            Self::MonthlyTotals,
            Self::CrimeTypeByDistrict,
            Self::ArrestRateByType,
            Self::DomesticDistrictMap,
            Self::ArrestRateByDistrict,
            Self::ArrestFlow,
            Self::ArrestsVsDomestic,
            Self::ArrestsVsNonDomestic,
            Self::CrimeTrends,
            Self::CrimeHeatmap,
            Self::CrimeTypeByYear,
            Self::MonthlyPanels,
        ]
    }

    /// Human-readable chart title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::CrimeTypes => "Top Crime Types",
            Self::MonthlyCycle => "Monthly Cycle by Year",
            Self::HourlyFrequency => "Crimes by Hour of Day",
            Self::MonthlyTotals => "Crimes by Month",
            Self::CrimeTypeByDistrict => "Crime Type by District",
            Self::ArrestRateByType => "Arrest Rate by Crime Type",
            Self::DomesticDistrictMap => "Domestic Cases by District",
            Self::ArrestRateByDistrict => "Arrest Rate by District",
            Self::ArrestFlow => "Crime Type, Domestic, and Arrest Flow",
            Self::ArrestsVsDomestic => "Arrests vs Domestic Cases",
            Self::ArrestsVsNonDomestic => "Arrests vs Non-Domestic Cases",
            Self::CrimeTrends => "Yearly Crime Trend",
            Self::CrimeHeatmap => "Crime Heatmap",
            Self::CrimeTypeByYear => "Crime Type by Year",
            Self::MonthlyPanels => "Monthly Trend by Year",
        }
    }
}

/// Least-squares line through a series, or an explicit marker that the
/// series has no defined trend (fewer than two distinct x values).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Trend {
    /// `y = slope * x + intercept`.
    Defined {
        /// Change in y per unit of x.
        slope: f64,
        /// Value of y at `x = 0`.
        intercept: f64,
    },
    /// No line can be fit.
    Undefined,
}

impl Trend {
    /// Value of the trend line at `x`, or `None` when undefined.
    #[must_use]
    pub fn at(self, x: f64) -> Option<f64> {
        match self {
            Self::Defined { slope, intercept } => Some(slope.mul_add(x, intercept)),
            Self::Undefined => None,
        }
    }
}

/// Incident count for one crime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    /// Crime type label.
    pub primary_type: String,
    /// Number of incidents.
    pub count: u64,
}

/// Arrest rate for one crime type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRate {
    /// Crime type label.
    pub primary_type: String,
    /// Arrests as a percentage of incidents (0-100).
    pub rate: f64,
}

/// Arrest rate for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictRate {
    /// Police district.
    pub district: i32,
    /// Arrests as a percentage of incidents (0-100).
    pub rate: f64,
}

/// Incident count for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
    /// Hour of day (0-23).
    pub hour: u32,
    /// Number of incidents.
    pub count: u64,
}

/// Incident count for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCount {
    /// Zero-based month.
    pub month: u32,
    /// Number of incidents.
    pub count: u64,
}

/// Incident count for one named month, across all years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotal {
    /// Zero-based month.
    pub month: u32,
    /// Month name (e.g. `"January"`).
    pub name: String,
    /// Number of incidents.
    pub count: u64,
}

/// Incident count for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Calendar year.
    pub year: i32,
    /// Number of incidents.
    pub count: u64,
}

/// One month's counts across every year, plus the trend over those years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCycle {
    /// Zero-based month.
    pub month: u32,
    /// One entry per year in the dataset, ascending.
    pub values: Vec<YearCount>,
    /// Trend with x = index into `values`.
    pub trend: Trend,
}

/// One panel of monthly counts for a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPanel {
    /// Calendar year.
    pub year: i32,
    /// Exactly twelve entries, January first.
    pub values: Vec<MonthCount>,
}

/// One cell of a year by month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatCell {
    /// Calendar year.
    pub year: i32,
    /// Zero-based month.
    pub month: u32,
    /// Number of distinct incidents.
    pub count: u64,
}

/// Pivoted (wide) table for a stacked chart.
///
/// Every row carries one count per entry of `categories`, in that order, so
/// stacking order is identical for every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackedTable {
    /// Series categories, in stacking order.
    pub categories: Vec<String>,
    /// One row per axis value, ascending.
    pub rows: Vec<StackedRow>,
}

/// One axis value of a [`StackedTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackedRow {
    /// Axis value (district or year).
    pub key: i32,
    /// Count per category, aligned with [`StackedTable::categories`].
    pub values: Vec<u64>,
}

impl StackedRow {
    /// Sum of every series in this row.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }
}

/// Domestic incidents in one district, located at the mean of their
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictPoint {
    /// Police district.
    pub district: i32,
    /// Number of domestic incidents.
    pub count: u64,
    /// Mean latitude.
    pub latitude: f64,
    /// Mean longitude.
    pub longitude: f64,
}

/// Cases and the arrests among them for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyArrests {
    /// Calendar year.
    pub year: i32,
    /// Number of cases.
    pub cases: u64,
    /// Number of those cases with an arrest.
    pub arrests: u64,
}

/// Yearly totals together with their linear trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyTrend {
    /// One entry per year present, ascending.
    pub counts: Vec<YearCount>,
    /// Trend with x = year.
    pub trend: Trend,
}

/// One leaf of the crime type, domestic, arrest breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRecord {
    /// Crime type label.
    pub primary_type: String,
    /// `"Domestic"` or `"Non-Domestic"`.
    pub domestic: String,
    /// `"Arrest"` or `"No Arrest"`.
    pub arrest: String,
    /// Number of incidents.
    pub count: u64,
}

/// A weighted edge between two flow stages, tagged with the crime type it
/// carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowLink {
    /// Source node label.
    pub source: String,
    /// Target node label.
    pub target: String,
    /// Crime type the flow belongs to.
    pub group: String,
    /// Number of incidents.
    pub value: u64,
}

/// Crime type to domestic to arrest breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrestFlow {
    /// Leaf counts.
    pub flows: Vec<FlowRecord>,
    /// Stage to stage edges.
    pub links: Vec<FlowLink>,
}

/// Output of one chart computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chart", content = "data", rename_all = "kebab-case")]
pub enum ChartData {
    /// See [`ChartKind::CrimeTypes`].
    CrimeTypes(Vec<TypeCount>),
    /// See [`ChartKind::MonthlyCycle`].
    MonthlyCycle(Vec<MonthCycle>),
    /// See [`ChartKind::HourlyFrequency`].
    HourlyFrequency(Vec<HourCount>),
    /// See [`ChartKind::MonthlyTotals`].
    MonthlyTotals(Vec<MonthTotal>),
    /// See [`ChartKind::CrimeTypeByDistrict`].
    CrimeTypeByDistrict(StackedTable),
    /// See [`ChartKind::ArrestRateByType`].
    ArrestRateByType(Vec<TypeRate>),
    /// See [`ChartKind::DomesticDistrictMap`].
    DomesticDistrictMap(Vec<DistrictPoint>),
    /// See [`ChartKind::ArrestRateByDistrict`].
    ArrestRateByDistrict(Vec<DistrictRate>),
    /// See [`ChartKind::ArrestFlow`].
    ArrestFlow(ArrestFlow),
    /// See [`ChartKind::ArrestsVsDomestic`].
    ArrestsVsDomestic(Vec<YearlyArrests>),
    /// See [`ChartKind::ArrestsVsNonDomestic`].
    ArrestsVsNonDomestic(Vec<YearlyArrests>),
    /// See [`ChartKind::CrimeTrends`].
    CrimeTrends(YearlyTrend),
    /// See [`ChartKind::CrimeHeatmap`].
    CrimeHeatmap(Vec<HeatCell>),
    /// See [`ChartKind::CrimeTypeByYear`].
    CrimeTypeByYear(StackedTable),
    /// See [`ChartKind::MonthlyPanels`].
    MonthlyPanels(Vec<YearPanel>),
}

impl ChartData {
    /// The chart this data belongs to.
    #[must_use]
    pub const fn kind(&self) -> ChartKind {
        match self {
            Self::CrimeTypes(_) => ChartKind::CrimeTypes,
            Self::MonthlyCycle(_) => ChartKind::MonthlyCycle,
            Self::HourlyFrequency(_) => ChartKind::HourlyFrequency,
            Self::MonthlyTotals(_) => ChartKind::MonthlyTotals,
            Self::CrimeTypeByDistrict(_) => ChartKind::CrimeTypeByDistrict,
            Self::ArrestRateByType(_) => ChartKind::ArrestRateByType,
            Self::DomesticDistrictMap(_) => ChartKind::DomesticDistrictMap,
            Self::ArrestRateByDistrict(_) => ChartKind::ArrestRateByDistrict,
            Self::ArrestFlow(_) => ChartKind::ArrestFlow,
            Self::ArrestsVsDomestic(_) => ChartKind::ArrestsVsDomestic,
            Self::ArrestsVsNonDomestic(_) => ChartKind::ArrestsVsNonDomestic,
            Self::CrimeTrends(_) => ChartKind::CrimeTrends,
            Self::CrimeHeatmap(_) => ChartKind::CrimeHeatmap,
            Self::CrimeTypeByYear(_) => ChartKind::CrimeTypeByYear,
            Self::MonthlyPanels(_) => ChartKind::MonthlyPanels,
        }
    }

    /// Number of top-level records (rows, bars, points) in the chart.
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::CrimeTypes(v) => v.len(),
            Self::MonthlyCycle(v) => v.len(),
            Self::HourlyFrequency(v) => v.len(),
            Self::MonthlyTotals(v) => v.len(),
            Self::CrimeTypeByDistrict(t) | Self::CrimeTypeByYear(t) => t.rows.len(),
            Self::ArrestRateByType(v) => v.len(),
            Self::DomesticDistrictMap(v) => v.len(),
            Self::ArrestRateByDistrict(v) => v.len(),
            Self::ArrestFlow(f) => f.flows.len(),
            Self::ArrestsVsDomestic(v) | Self::ArrestsVsNonDomestic(v) => v.len(),
            Self::CrimeTrends(t) => t.counts.len(),
            Self::CrimeHeatmap(v) => v.len(),
            Self::MonthlyPanels(v) => v.len(),
        }
    }
}
