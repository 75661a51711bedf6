//! CSV loader for Maryland-style crash reports.
//!
//! Every cell is kept as text. Columns are looked up by exact header name;
//! a column that is not present reads as absent on every row.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::LoadError;

pub const COL_CRASH_TIME: &str = "Crash Date/Time";
pub const COL_WEATHER: &str = "Weather";
pub const COL_INJURY_SEVERITY: &str = "Injury Severity";
pub const COL_COLLISION_TYPE: &str = "Collision Type";
pub const COL_DRIVER_AT_FAULT: &str = "Driver At Fault";

/// Cell values read as missing, the same set a dataframe reader treats as NA by default.
static NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One accident report row, restricted to the columns the overview uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrashRecord {
    pub crash_time: Option<String>,
    pub weather: Option<String>,
    pub injury_severity: Option<String>,
    pub collision_type: Option<String>,
    pub driver_at_fault: Option<String>,
}

/// Header positions of the columns we read.
#[derive(Debug, Default)]
struct ColumnIndex {
    crash_time: Option<usize>,
    weather: Option<usize>,
    injury_severity: Option<usize>,
    collision_type: Option<usize>,
    driver_at_fault: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            crash_time: find(COL_CRASH_TIME),
            weather: find(COL_WEATHER),
            injury_severity: find(COL_INJURY_SEVERITY),
            collision_type: find(COL_COLLISION_TYPE),
            driver_at_fault: find(COL_DRIVER_AT_FAULT),
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        [
            (self.crash_time, COL_CRASH_TIME),
            (self.weather, COL_WEATHER),
            (self.injury_severity, COL_INJURY_SEVERITY),
            (self.collision_type, COL_COLLISION_TYPE),
            (self.driver_at_fault, COL_DRIVER_AT_FAULT),
        ]
        .into_iter()
        .filter(|(idx, _)| idx.is_none())
        .map(|(_, name)| name)
        .collect()
    }

    fn record(&self, row: &StringRecord) -> CrashRecord {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(non_na);
        CrashRecord {
            crash_time: cell(self.crash_time),
            weather: cell(self.weather),
            injury_severity: cell(self.injury_severity),
            collision_type: cell(self.collision_type),
            driver_at_fault: cell(self.driver_at_fault),
        }
    }
}

/// Returns the cell as an owned string unless it is an NA token.
pub fn non_na(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if NA_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Reads all rows of the CSV at `path`.
///
/// # Errors
///
/// [`LoadError::FileAccess`] if the file cannot be opened and
/// [`LoadError::Parse`] if the csv reader rejects a record.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<CrashRecord>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = rdr.headers().map_err(|e| LoadError::parse(path, e))?.clone();
    let columns = ColumnIndex::from_headers(&headers);
    let missing = columns.missing();
    if !missing.is_empty() {
        warn!(?missing, "Expected columns not found, treating them as empty");
    }
    debug!(header_count = headers.len(), "CSV headers read");

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| LoadError::parse(path, e))?;
        records.push(columns.record(&row));
    }

    info!(rows = records.len(), "Accident data loaded");
    Ok(records)
}
