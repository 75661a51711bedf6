use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::aggregate::types::{CollisionCount, WeatherSummary, YearPivot};
use crate::categories::{CollisionCategory, DRIVER_AT_FAULT_VALUES, InjuryGroup};
use crate::clean::CleanRecord;

/// Distinct weather values in the order they first appear.
pub fn weather_order(records: &[CleanRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for r in records {
        if !seen.iter().any(|w| w == &r.weather) {
            seen.push(r.weather.clone());
        }
    }
    seen
}

/// Aggregates every weather condition present, in first-occurrence order.
#[tracing::instrument(skip_all, fields(rows = records.len()))]
pub fn summarize(records: &[CleanRecord]) -> Vec<WeatherSummary> {
    weather_order(records)
        .into_iter()
        .map(|weather| {
            let rows: Vec<&CleanRecord> = records.iter().filter(|r| r.weather == weather).collect();
            summarize_weather(weather, &rows)
        })
        .collect()
}

fn summarize_weather(weather: String, rows: &[&CleanRecord]) -> WeatherSummary {
    let mut totals: BTreeMap<i32, usize> = BTreeMap::new();
    for r in rows {
        *totals.entry(r.year).or_default() += 1;
    }
    let years: Vec<i32> = totals.keys().copied().collect();

    let fault_columns = fault_column_order(rows);
    let driver_at_fault = YearPivot::from_observations(
        &years,
        &fault_columns,
        rows.iter().map(|r| (r.year, r.driver_at_fault.as_str())),
    );

    let injury_columns: Vec<String> = InjuryGroup::ALL
        .iter()
        .filter(|g| rows.iter().any(|r| r.injury_group == **g))
        .map(|g| g.label().to_string())
        .collect();
    let injury_severity = YearPivot::from_observations(
        &years,
        &injury_columns,
        rows.iter().map(|r| (r.year, r.injury_group.label())),
    );

    let collisions = collision_counts(rows);

    debug!(
        weather = %weather,
        rows = rows.len(),
        years = years.len(),
        fault_columns = fault_columns.len(),
        injury_columns = injury_columns.len(),
        collision_points = collisions.len(),
        "Weather aggregated"
    );

    WeatherSummary {
        weather,
        totals: totals.into_iter().collect(),
        driver_at_fault,
        injury_severity,
        collisions,
    }
}

/// Yes, No, Unknown first (when present), then any other values sorted.
fn fault_column_order(rows: &[&CleanRecord]) -> Vec<String> {
    let present: BTreeSet<&str> = rows.iter().map(|r| r.driver_at_fault.as_str()).collect();

    let mut order: Vec<String> = DRIVER_AT_FAULT_VALUES
        .iter()
        .filter(|v| present.contains(*v))
        .map(|v| v.to_string())
        .collect();
    order.extend(
        present
            .iter()
            .filter(|v| !DRIVER_AT_FAULT_VALUES.contains(*v))
            .map(|v| v.to_string()),
    );
    order
}

/// Long-form `(year, category, count)` rows, category order then year ascending.
///
/// Rows without a collision category are not counted.
fn collision_counts(rows: &[&CleanRecord]) -> Vec<CollisionCount> {
    let mut counts: BTreeMap<(CollisionCategory, i32), usize> = BTreeMap::new();
    for r in rows {
        if let Some(category) = r.collision_category {
            *counts.entry((category, r.year)).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|((category, year), count)| CollisionCount {
            year,
            category,
            count,
        })
        .collect()
}
