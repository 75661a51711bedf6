use crash_weather_overview::aggregate::summarize;
use crash_weather_overview::categories::{ALLOWED_WEATHER, CollisionCategory, InjuryGroup};
use crash_weather_overview::clean::{YearRange, clean, clean_with_stats, reclean};
use crash_weather_overview::loader::load_records;
use crash_weather_overview::render::{FigurePlan, RenderConfig};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_crashes.csv");

#[test]
fn test_full_pipeline() {
    let records = load_records(FIXTURE).expect("Failed to load fixture");
    assert_eq!(records.len(), 13);

    let range = YearRange::default();
    let (cleaned, stats) = clean_with_stats(&records, &range);

    // foggy, empty weather, 2014, 2024 and the unparseable date are dropped
    assert_eq!(cleaned.len(), 8);
    assert_eq!(stats.bad_timestamp, 1);
    assert_eq!(stats.year_out_of_range, 2);
    assert_eq!(stats.unsupported_weather, 2);
    for r in &cleaned {
        assert!(range.contains(r.year));
        assert!(ALLOWED_WEATHER.contains(&r.weather.as_str()));
    }

    let summaries = summarize(&cleaned);
    let order: Vec<_> = summaries.iter().map(|s| s.weather.as_str()).collect();
    assert_eq!(order, vec!["Clear", "Raining", "Snow", "Cloudy"]);

    for s in &summaries {
        for (year, total) in &s.totals {
            assert_eq!(s.driver_at_fault.row_total(*year), *total);
        }
    }

    let plan = FigurePlan::new(&summaries, &RenderConfig::default()).unwrap();
    assert_eq!(plan.panel_count(), 4);
    assert_eq!(plan.legend.len(), 11);
}

#[test]
fn test_relabeling_from_fixture() {
    let records = load_records(FIXTURE).unwrap();
    let cleaned = clean(&records, &YearRange::default());

    let cloudy = cleaned.iter().find(|r| r.weather == "Cloudy").unwrap();
    assert_eq!(cloudy.injury_group, InjuryGroup::Injured);
    // STRAIGHT MOVEMENT ANGLE has no category
    assert_eq!(cloudy.collision_category, None);

    // "N/A" severity reads as missing and falls back to Other
    let tesla = cleaned
        .iter()
        .find(|r| r.collision_type_raw.as_deref() == Some("SAME DIRECTION SIDESWIPE"))
        .unwrap();
    assert_eq!(tesla.weather, "Clear");
    assert_eq!(tesla.injury_group, InjuryGroup::Other);
    assert_eq!(tesla.collision_category, Some(CollisionCategory::SideSwipe));
}

#[test]
fn test_uncategorized_collision_only_leaves_collision_counts() {
    let records = load_records(FIXTURE).unwrap();
    let summaries = summarize(&clean(&records, &YearRange::default()));
    let cloudy = summaries.iter().find(|s| s.weather == "Cloudy").unwrap();

    assert_eq!(cloudy.total_rows(), 1);
    assert_eq!(cloudy.driver_at_fault.row_total(2021), 1);
    assert_eq!(cloudy.injury_severity.row_total(2021), 1);
    assert!(cloudy.collisions.is_empty());
}

#[test]
fn test_cleaning_is_idempotent_on_fixture() {
    let records = load_records(FIXTURE).unwrap();
    let range = YearRange::default();
    let once = clean(&records, &range);

    assert_eq!(reclean(&once, &range), once);
}
