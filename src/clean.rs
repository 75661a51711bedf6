//! Row cleaning: timestamp parsing, year window, weather normalization and relabeling.
//!
//! Rows that fail a filter are dropped silently and only counted in [`CleanStats`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

use crate::categories::{
    CollisionCategory, InjuryGroup, UNKNOWN_FAULT, UNKNOWN_WEATHER, is_allowed_weather,
    map_collision_type, map_injury_severity,
};
use crate::loader::CrashRecord;

static DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %I:%M:%S %p",
    "%Y/%m/%d %H:%M:%S",
];

static DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// Inclusive window of crash years kept for the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 2015,
            max: 2023,
        }
    }
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// A report that survived every filter, with its derived labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanRecord {
    pub crash_time: NaiveDateTime,
    pub year: i32,
    pub weather: String,
    pub injury_group: InjuryGroup,
    pub collision_category: Option<CollisionCategory>,
    pub driver_at_fault: String,
    pub injury_severity_raw: Option<String>,
    pub collision_type_raw: Option<String>,
}

/// Why a row was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    BadTimestamp,
    YearOutOfRange,
    UnsupportedWeather,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub input_rows: usize,
    pub kept: usize,
    pub bad_timestamp: usize,
    pub year_out_of_range: usize,
    pub unsupported_weather: usize,
}

impl CleanStats {
    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::BadTimestamp => self.bad_timestamp += 1,
            DropReason::YearOutOfRange => self.year_out_of_range += 1,
            DropReason::UnsupportedWeather => self.unsupported_weather += 1,
        }
    }
}

/// Parses a crash timestamp in any of the accepted layouts; anything else is `None`.
pub fn parse_crash_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Capitalizes the first letter of every word and lower-cases the rest.
///
/// A letter starts a word when the character before it is not a letter.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if prev_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_is_letter = c.is_alphabetic();
    }
    out
}

/// Fills a missing weather value with `"Unknown"` and title-cases the result.
pub fn normalize_weather(raw: Option<&str>) -> String {
    title_case(raw.unwrap_or(UNKNOWN_WEATHER))
}

fn clean_one(
    crash_time: Option<NaiveDateTime>,
    weather: Option<&str>,
    injury_severity: Option<&str>,
    collision_type: Option<&str>,
    driver_at_fault: Option<&str>,
    years: &YearRange,
) -> Result<CleanRecord, DropReason> {
    let crash_time = crash_time.ok_or(DropReason::BadTimestamp)?;
    let year = crash_time.year();
    if !years.contains(year) {
        return Err(DropReason::YearOutOfRange);
    }

    let weather = normalize_weather(weather);
    if !is_allowed_weather(&weather) {
        return Err(DropReason::UnsupportedWeather);
    }

    Ok(CleanRecord {
        crash_time,
        year,
        weather,
        injury_group: map_injury_severity(injury_severity),
        collision_category: map_collision_type(collision_type),
        driver_at_fault: driver_at_fault.unwrap_or(UNKNOWN_FAULT).to_string(),
        injury_severity_raw: injury_severity.map(str::to_string),
        collision_type_raw: collision_type.map(str::to_string),
    })
}

/// Cleans loaded rows, returning the survivors and per-reason drop counts.
#[tracing::instrument(skip_all, fields(rows = records.len(), year_min = years.min, year_max = years.max))]
pub fn clean_with_stats(records: &[CrashRecord], years: &YearRange) -> (Vec<CleanRecord>, CleanStats) {
    let mut stats = CleanStats {
        input_rows: records.len(),
        ..Default::default()
    };
    let mut kept = Vec::with_capacity(records.len());

    for r in records {
        let crash_time = r.crash_time.as_deref().and_then(parse_crash_timestamp);
        match clean_one(
            crash_time,
            r.weather.as_deref(),
            r.injury_severity.as_deref(),
            r.collision_type.as_deref(),
            r.driver_at_fault.as_deref(),
            years,
        ) {
            Ok(rec) => kept.push(rec),
            Err(reason) => stats.record_drop(reason),
        }
    }

    stats.kept = kept.len();
    debug!(
        bad_timestamp = stats.bad_timestamp,
        year_out_of_range = stats.year_out_of_range,
        unsupported_weather = stats.unsupported_weather,
        "Rows dropped during cleaning"
    );
    info!(kept = stats.kept, input = stats.input_rows, "Cleaning complete");

    (kept, stats)
}

pub fn clean(records: &[CrashRecord], years: &YearRange) -> Vec<CleanRecord> {
    clean_with_stats(records, years).0
}

/// Runs the cleaning filters again over rows that were already cleaned.
///
/// Cleaning is idempotent, so the result equals the input.
pub fn reclean(records: &[CleanRecord], years: &YearRange) -> Vec<CleanRecord> {
    records
        .iter()
        .filter_map(|r| {
            clean_one(
                Some(r.crash_time),
                Some(&r.weather),
                r.injury_severity_raw.as_deref(),
                r.collision_type_raw.as_deref(),
                Some(&r.driver_at_fault),
                years,
            )
            .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(time: &str, weather: Option<&str>, fault: &str) -> CrashRecord {
        CrashRecord {
            crash_time: Some(time.to_string()),
            weather: weather.map(str::to_string),
            injury_severity: Some("NO APPARENT INJURY".to_string()),
            collision_type: Some("HEAD ON".to_string()),
            driver_at_fault: Some(fault.to_string()),
        }
    }

    #[rstest]
    #[case("05/16/2019 03:15:00 PM", 2019)]
    #[case("01/01/2015 12:00:00 AM", 2015)]
    #[case("12/31/2023 23:59", 2023)]
    #[case("2021-07-04 08:30:00", 2021)]
    #[case("2021-07-04T08:30:00.250", 2021)]
    #[case("2018-03-02T10:00:00-05:00", 2018)]
    #[case("2017/11/05 09:00:00 PM", 2017)]
    #[case("2016-02-29", 2016)]
    #[case("02/14/2020", 2020)]
    fn test_parse_crash_timestamp_formats(#[case] raw: &str, #[case] year: i32) {
        let parsed = parse_crash_timestamp(raw).unwrap();
        assert_eq!(parsed.year(), year);
    }

    #[rstest]
    #[case("")]
    #[case("not a date")]
    #[case("13/45/2020")]
    #[case("2019-02-30")]
    fn test_parse_crash_timestamp_rejects(#[case] raw: &str) {
        assert_eq!(parse_crash_timestamp(raw), None);
    }

    #[rstest]
    #[case("clear", "Clear")]
    #[case("CLEAR", "Clear")]
    #[case("raining", "Raining")]
    #[case("fog, smog, smoke", "Fog, Smog, Smoke")]
    #[case("blowing snow", "Blowing Snow")]
    #[case("", "")]
    fn test_title_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_case(input), expected);
    }

    #[test]
    fn test_normalize_missing_weather_is_unknown() {
        assert_eq!(normalize_weather(None), "Unknown");
        assert_eq!(normalize_weather(Some("SNOW")), "Snow");
    }

    #[test]
    fn test_clean_case_normalizes_and_drops_unsupported_weather() {
        let records = vec![
            record("2020-05-01 10:00:00", Some("clear"), "Yes"),
            record("2020-05-02 10:00:00", Some("CLEAR"), "No"),
            record("2020-05-03 10:00:00", Some("foggy"), "Yes"),
        ];
        let (kept, stats) = clean_with_stats(&records, &YearRange::default());

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.weather == "Clear"));
        assert_eq!(stats.unsupported_weather, 1);
    }

    #[test]
    fn test_clean_drops_missing_weather() {
        let records = vec![record("2020-05-01 10:00:00", None, "Yes")];
        let (kept, stats) = clean_with_stats(&records, &YearRange::default());

        assert!(kept.is_empty());
        assert_eq!(stats.unsupported_weather, 1);
    }

    #[test]
    fn test_clean_year_window_is_inclusive() {
        let records = vec![
            record("12/31/2014 11:59:59 PM", Some("Clear"), "Yes"),
            record("01/01/2015 12:00:00 AM", Some("Clear"), "Yes"),
            record("12/31/2023 11:59:59 PM", Some("Clear"), "Yes"),
            record("01/01/2024 12:00:00 AM", Some("Clear"), "Yes"),
            record("garbage", Some("Clear"), "Yes"),
        ];
        let (kept, stats) = clean_with_stats(&records, &YearRange::default());

        let years: Vec<_> = kept.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2015, 2023]);
        assert_eq!(stats.year_out_of_range, 2);
        assert_eq!(stats.bad_timestamp, 1);
        assert_eq!(stats.kept, 2);
    }

    #[test]
    fn test_clean_relabels_categories() {
        let mut r = record("2019-01-01", Some("Raining"), "Yes");
        r.injury_severity = Some("Suspected Minor Injury".to_string());
        r.collision_type = Some("totally unknown type".to_string());
        r.driver_at_fault = None;

        let kept = clean(&[r], &YearRange::default());

        assert_eq!(kept[0].injury_group, InjuryGroup::Injured);
        assert_eq!(kept[0].collision_category, None);
        assert_eq!(kept[0].driver_at_fault, "Unknown");
    }

    #[test]
    fn test_clean_output_invariants() {
        let records = vec![
            record("2016-01-01", Some("cloudy"), "Yes"),
            record("2010-01-01", Some("cloudy"), "Yes"),
            record("2022-01-01", Some("SNOW"), "No"),
            record("2022-01-01", Some("sleet"), "No"),
            record("2022-01-01", Some("unknown"), "No"),
        ];
        let range = YearRange::default();
        let kept = clean(&records, &range);

        assert_eq!(kept.len(), 2);
        for r in &kept {
            assert!(range.contains(r.year));
            assert!(is_allowed_weather(&r.weather));
        }
    }

    #[test]
    fn test_reclean_is_idempotent() {
        let records = vec![
            record("2016-01-01", Some("cloudy"), "Yes"),
            record("2022-06-01 14:00:00", Some("RAINING"), "Unknown"),
            record("2019-06-01", Some("Clear"), "No"),
        ];
        let range = YearRange::default();
        let once = clean(&records, &range);
        let twice = reclean(&once, &range);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_narrower_year_range() {
        let records = vec![
            record("2016-01-01", Some("Clear"), "Yes"),
            record("2020-01-01", Some("Clear"), "Yes"),
        ];
        let kept = clean(&records, &YearRange { min: 2018, max: 2020 });

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].year, 2020);
    }
}
