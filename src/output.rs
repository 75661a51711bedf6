//! Output formatting and persistence for weather summaries.
//!
//! Supports pretty-printing, JSON logging, and a long-form CSV export.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{WeatherSummary, YearPivot};
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// One exported count: `dimension` says which aggregation the row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow<'a> {
    pub weather: &'a str,
    pub year: i32,
    pub dimension: &'static str,
    pub category: &'a str,
    pub count: usize,
}

/// Logs the summaries using Rust's debug pretty-print format.
pub fn print_pretty(summaries: &[WeatherSummary]) {
    debug!("{:#?}", summaries);
}

/// Logs the summaries as pretty-printed JSON.
pub fn print_json(summaries: &[WeatherSummary]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summaries)?);
    Ok(())
}

fn pivot_rows<'a>(
    weather: &'a str,
    dimension: &'static str,
    pivot: &'a YearPivot,
) -> impl Iterator<Item = CountRow<'a>> + 'a {
    pivot.columns.iter().flat_map(move |column| {
        pivot
            .years
            .iter()
            .zip(&column.counts)
            .map(move |(year, count)| CountRow {
                weather,
                year: *year,
                dimension,
                category: &column.label,
                count: *count,
            })
    })
}

/// Flattens every aggregation into long-form rows.
pub fn count_rows(summaries: &[WeatherSummary]) -> Vec<CountRow<'_>> {
    let mut rows = Vec::new();
    for s in summaries {
        rows.extend(s.totals.iter().map(|(year, count)| CountRow {
            weather: &s.weather,
            year: *year,
            dimension: "total",
            category: "All",
            count: *count,
        }));
        rows.extend(pivot_rows(&s.weather, "driver_at_fault", &s.driver_at_fault));
        rows.extend(pivot_rows(&s.weather, "injury_severity", &s.injury_severity));
        rows.extend(s.collisions.iter().map(|c| CountRow {
            weather: &s.weather,
            year: c.year,
            dimension: "collision_category",
            category: c.category.label(),
            count: c.count,
        }));
    }
    rows
}

/// Writes all counts to a new CSV file at `path`, replacing any existing file.
pub fn write_counts_csv(path: &Path, summaries: &[WeatherSummary]) -> Result<usize> {
    let rows = count_rows(summaries);
    debug!(path = %path.display(), rows = rows.len(), "Writing count CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(rows.len())
}
