//! One function per dashboard chart.
//!
//! Every function is pure: it reads the shared incident snapshot and returns
//! the chart's records in their final order. Charts keyed on "year" use the
//! calendar year of the occurrence date, except the ones fed by the
//! dataset's own `Year` column ([`crime_trends`], [`arrests_vs_domestic`],
//! [`arrests_vs_non_domestic`] and [`crime_type_by_year`]).

use crime_dash_aggregate::{
    Count, Flag, Mean, Measure, Reduce as _, Rollup, Tally, UniqueCount, domain_of, group_by,
    months, rollup, rollup2, rollup3,
};
use crime_dash_analytics_models::{
    ArrestFlow, ChartData, ChartKind, DistrictPoint, DistrictRate, FlowLink, FlowRecord, HeatCell,
    HourCount, MonthCount, MonthCycle, MonthTotal, StackedTable, TypeCount, TypeRate, YearCount,
    YearPanel, YearlyArrests, YearlyTrend, month_name,
};
use crime_dash_incident_models::Incident;

use crate::bucket;
use crate::pivot::stacked_table;
use crate::rank::top_n;
use crate::rate::ranked_rate;
use crate::settings::ChartSettings;
use crate::trend::linear_trend;

const DOMESTIC: &str = "Domestic";
const NON_DOMESTIC: &str = "Non-Domestic";
const ARREST: &str = "Arrest";
const NO_ARREST: &str = "No Arrest";

fn primary_type(incident: &Incident) -> Option<String> {
    incident.primary_type.clone()
}

const fn recorded_year(incident: &Incident) -> Option<i32> {
    incident.year
}

/// Runs the computation for `kind`.
#[must_use]
pub fn compute(kind: ChartKind, incidents: &[Incident], settings: &ChartSettings) -> ChartData {
    log::trace!("compute: {kind} over {} incidents", incidents.len());

    match kind {
        ChartKind::CrimeTypes => ChartData::CrimeTypes(crime_types(incidents, settings)),
        ChartKind::MonthlyCycle => ChartData::MonthlyCycle(monthly_cycle(incidents)),
        ChartKind::HourlyFrequency => {
            ChartData::HourlyFrequency(hourly_frequency(incidents, settings))
        }
        ChartKind::MonthlyTotals => ChartData::MonthlyTotals(monthly_totals(incidents)),
        ChartKind::CrimeTypeByDistrict => {
            ChartData::CrimeTypeByDistrict(crime_type_by_district(incidents, settings))
        }
        ChartKind::ArrestRateByType => ChartData::ArrestRateByType(arrest_rate_by_type(incidents)),
        ChartKind::DomesticDistrictMap => {
            ChartData::DomesticDistrictMap(domestic_district_map(incidents))
        }
        ChartKind::ArrestRateByDistrict => {
            ChartData::ArrestRateByDistrict(arrest_rate_by_district(incidents))
        }
        ChartKind::ArrestFlow => ChartData::ArrestFlow(arrest_flow(incidents, settings)),
        ChartKind::ArrestsVsDomestic => {
            ChartData::ArrestsVsDomestic(arrests_vs_domestic(incidents))
        }
        ChartKind::ArrestsVsNonDomestic => {
            ChartData::ArrestsVsNonDomestic(arrests_vs_non_domestic(incidents))
        }
        ChartKind::CrimeTrends => ChartData::CrimeTrends(crime_trends(incidents, settings)),
        ChartKind::CrimeHeatmap => ChartData::CrimeHeatmap(crime_heatmap(incidents)),
        ChartKind::CrimeTypeByYear => ChartData::CrimeTypeByYear(crime_type_by_year(incidents)),
        ChartKind::MonthlyPanels => ChartData::MonthlyPanels(monthly_panels(incidents)),
    }
}

/// The `top_n` most frequent crime types.
#[must_use]
pub fn crime_types(incidents: &[Incident], settings: &ChartSettings) -> Vec<TypeCount> {
    top_n(rollup(incidents, primary_type, &Count), settings.top_n)
        .into_iter()
        .map(|(primary_type, count)| TypeCount { primary_type, count })
        .collect()
}

/// For each month, the count in every year of the dataset plus a trend
/// fitted against the year's position in that list.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn monthly_cycle(incidents: &[Incident]) -> Vec<MonthCycle> {
    let years = domain_of(incidents, Incident::occurred_year);
    if years.is_empty() {
        return Vec::new();
    }

    rollup2(incidents, Incident::month, Incident::occurred_year, &Count)
        .fill_nested(&months(), &years)
        .into_iter()
        .map(|(month, series)| {
            let points: Vec<(f64, f64)> = series
                .iter()
                .enumerate()
                .map(|(index, (_, count))| (index as f64, *count as f64))
                .collect();
            MonthCycle {
                month,
                trend: linear_trend(&points),
                values: series
                    .into_iter()
                    .map(|(year, count)| YearCount { year, count })
                    .collect(),
            }
        })
        .collect()
}

/// Count per hour of day, all 24 hours present.
#[must_use]
pub fn hourly_frequency(incidents: &[Incident], settings: &ChartSettings) -> Vec<HourCount> {
    bucket::by_hour(incidents, settings.hourly_count_mode)
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}

/// Count per calendar month across all years, busiest month first. Months
/// with no incidents are left out.
#[must_use]
pub fn monthly_totals(incidents: &[Incident]) -> Vec<MonthTotal> {
    top_n(rollup(incidents, Incident::month, &Count), months().len())
        .into_iter()
        .map(|(month, count)| MonthTotal {
            month,
            name: month_name(month).to_string(),
            count,
        })
        .collect()
}

/// Stacked counts of the `top_n` crime types per district. Districts are
/// ascending; categories follow overall frequency.
#[must_use]
pub fn crime_type_by_district(incidents: &[Incident], settings: &ChartSettings) -> StackedTable {
    let categories: Vec<String> = top_n(rollup(incidents, primary_type, &Count), settings.top_n)
        .into_iter()
        .map(|(primary_type, _)| primary_type)
        .collect();
    let districts = domain_of(incidents, |i| i.district);
    let nested = rollup2(incidents, |i| i.district, primary_type, &Count);

    stacked_table(&nested, &districts, &categories)
}

/// Percentage of incidents with an arrest, per crime type, highest first.
#[must_use]
pub fn arrest_rate_by_type(incidents: &[Incident]) -> Vec<TypeRate> {
    let arrests: Vec<&Incident> = incidents.iter().filter(|i| i.arrest).collect();
    let totals = rollup(incidents, primary_type, &Count);
    let hits = rollup(arrests, primary_type, &Count);

    ranked_rate(&hits, &totals)
        .into_iter()
        .map(|(primary_type, rate)| TypeRate { primary_type, rate })
        .collect()
}

/// Domestic incidents per district, placed at the mean of their
/// coordinates. Incidents without a district or coordinates are skipped.
#[must_use]
pub fn domestic_district_map(incidents: &[Incident]) -> Vec<DistrictPoint> {
    let located = incidents
        .iter()
        .filter(|i| i.domestic && i.district.is_some() && i.coordinates().is_some());

    group_by(located, |i| i.district)
        .sorted_by_key()
        .into_iter()
        .filter_map(|(district, group)| {
            Some(DistrictPoint {
                district,
                count: Count.reduce(&group),
                latitude: Mean(Measure::Latitude).reduce(&group)?,
                longitude: Mean(Measure::Longitude).reduce(&group)?,
            })
        })
        .collect()
}

/// Percentage of incidents with an arrest, per district, highest first.
#[must_use]
pub fn arrest_rate_by_district(incidents: &[Incident]) -> Vec<DistrictRate> {
    let arrests: Vec<&Incident> = incidents.iter().filter(|i| i.arrest).collect();
    let totals = rollup(incidents, |i| i.district, &Count);
    let hits = rollup(arrests, |i| i.district, &Count);

    ranked_rate(&hits, &totals)
        .into_iter()
        .map(|(district, rate)| DistrictRate { district, rate })
        .collect()
}

/// Crime type to domestic status to arrest outcome, restricted to the
/// `top_n` crime types. Rows with a blank `Arrest` or `Domestic` value are
/// left out before ranking.
///
/// Flows are ordered by crime type rank, then domestic before non-domestic,
/// then arrest before no arrest. Links between the same pair of stages for
/// the same crime type are merged.
#[must_use]
pub fn arrest_flow(incidents: &[Incident], settings: &ChartSettings) -> ArrestFlow {
    let complete: Vec<&Incident> = incidents.iter().filter(|i| !i.missing_flags).collect();
    let ranked: Vec<String> =
        top_n(rollup(complete.iter().copied(), primary_type, &Count), settings.top_n)
            .into_iter()
            .map(|(primary_type, _)| primary_type)
            .collect();
    let selected: Vec<&Incident> = complete
        .into_iter()
        .filter(|i| i.primary_type.as_ref().is_some_and(|t| ranked.contains(t)))
        .collect();

    let nested = rollup3(
        selected,
        primary_type,
        |i| Some(if i.domestic { DOMESTIC } else { NON_DOMESTIC }),
        |i| Some(if i.arrest { ARREST } else { NO_ARREST }),
        &Count,
    );

    let mut flows = Vec::new();
    let mut links: Rollup<(String, String, String), u64> = Rollup::new();

    for primary_type in &ranked {
        let Some(by_domestic) = nested.get(primary_type) else {
            continue;
        };
        for domestic in [DOMESTIC, NON_DOMESTIC] {
            let Some(by_arrest) = by_domestic.get(&domestic) else {
                continue;
            };
            for arrest in [ARREST, NO_ARREST] {
                let Some(&count) = by_arrest.get(&arrest) else {
                    continue;
                };
                *links.get_or_insert_with(
                    (primary_type.clone(), domestic.to_string(), primary_type.clone()),
                    || 0,
                ) += count;
                *links.get_or_insert_with(
                    (domestic.to_string(), arrest.to_string(), primary_type.clone()),
                    || 0,
                ) += count;
                flows.push(FlowRecord {
                    primary_type: primary_type.clone(),
                    domestic: domestic.to_string(),
                    arrest: arrest.to_string(),
                    count,
                });
            }
        }
    }

    ArrestFlow {
        flows,
        links: links
            .into_entries()
            .into_iter()
            .map(|((source, target, group), value)| FlowLink {
                source,
                target,
                group,
                value,
            })
            .collect(),
    }
}

fn yearly_arrests<'a>(incidents: impl IntoIterator<Item = &'a Incident>) -> Vec<YearlyArrests> {
    rollup(incidents, recorded_year, &Tally(Flag::Arrest))
        .sorted_by_key()
        .into_iter()
        .map(|(year, tally)| YearlyArrests {
            year,
            cases: tally.total,
            arrests: tally.flagged,
        })
        .collect()
}

/// Domestic cases and the arrests among them, per recorded year.
#[must_use]
pub fn arrests_vs_domestic(incidents: &[Incident]) -> Vec<YearlyArrests> {
    yearly_arrests(incidents.iter().filter(|i| i.domestic))
}

/// Non-domestic cases and the arrests among them, per recorded year.
#[must_use]
pub fn arrests_vs_non_domestic(incidents: &[Incident]) -> Vec<YearlyArrests> {
    yearly_arrests(incidents.iter().filter(|i| !i.domestic))
}

/// Incidents per recorded year inside the configured range, with a linear
/// trend over (year, count).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn crime_trends(incidents: &[Incident], settings: &ChartSettings) -> YearlyTrend {
    let in_range = incidents
        .iter()
        .filter(|i| i.year.is_some_and(|y| settings.in_year_range(y)));

    let counts: Vec<YearCount> = rollup(in_range, recorded_year, &Count)
        .sorted_by_key()
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect();
    let points: Vec<(f64, f64)> = counts
        .iter()
        .map(|c| (f64::from(c.year), c.count as f64))
        .collect();

    YearlyTrend {
        trend: linear_trend(&points),
        counts,
    }
}

/// Distinct incidents per year and month. Every year present in the data
/// gets all twelve months.
#[must_use]
pub fn crime_heatmap(incidents: &[Incident]) -> Vec<HeatCell> {
    let years = domain_of(incidents, Incident::occurred_year);

    rollup2(incidents, Incident::occurred_year, Incident::month, &UniqueCount)
        .fill_nested(&years, &months())
        .into_iter()
        .flat_map(|(year, series)| {
            series
                .into_iter()
                .map(move |(month, count)| HeatCell { year, month, count })
        })
        .collect()
}

/// Stacked counts of every crime type per recorded year. Years ascend and
/// categories are alphabetical.
#[must_use]
pub fn crime_type_by_year(incidents: &[Incident]) -> StackedTable {
    let years = domain_of(incidents, recorded_year);
    let categories = domain_of(incidents, primary_type);
    let nested = rollup2(incidents, recorded_year, primary_type, &Count);

    stacked_table(&nested, &years, &categories)
}

/// One panel per year with all twelve monthly counts.
#[must_use]
pub fn monthly_panels(incidents: &[Incident]) -> Vec<YearPanel> {
    let years = domain_of(incidents, Incident::occurred_year);

    rollup2(incidents, Incident::occurred_year, Incident::month, &Count)
        .fill_nested(&years, &months())
        .into_iter()
        .map(|(year, series)| YearPanel {
            year,
            values: series
                .into_iter()
                .map(|(month, count)| MonthCount { month, count })
                .collect(),
        })
        .collect()
}
