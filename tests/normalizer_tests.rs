use chrono::{TimeZone, Utc};
use sov_studio::loader::MetricRecord;
use sov_studio::normalizer::{normalize, ParsePolicy, RetentionWindow};
use sov_studio::utils::ParseError;

fn window(start_day: u32, end_day: u32) -> RetentionWindow {
    RetentionWindow::new(
        Utc.with_ymd_and_hms(2024, 1, start_day, 0, 0, 0).unwrap(),
        Some(Utc.with_ymd_and_hms(2024, 1, end_day, 0, 0, 0).unwrap()),
    )
    .unwrap()
}

fn record(entity: &str, timestamp: Option<&str>) -> MetricRecord {
    let record = MetricRecord::new(entity).with_metric("views", 1.0);
    match timestamp {
        Some(ts) => record.with_timestamp(ts),
        None => record,
    }
}

#[test]
fn test_window_includes_and_excludes() {
    let records = vec![
        record("A", Some("2024-01-05")),
        record("B", Some("2024-01-10")),
    ];

    let outcome = normalize(&records, Some(&window(1, 8)), ParsePolicy::Lenient).unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].entity, "A");
    assert_eq!(outcome.outside_window, 1);
    assert_eq!(outcome.skipped, 0);
}

#[test]
fn test_window_start_inclusive_end_exclusive() {
    let records = vec![
        record("start", Some("2024-01-01T00:00:00Z")),
        record("end", Some("2024-01-08T00:00:00Z")),
        record("late", Some("2024-01-07T23:59:59Z")),
    ];

    let outcome = normalize(&records, Some(&window(1, 8)), ParsePolicy::Lenient).unwrap();

    let kept: Vec<&str> = outcome.records.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(kept, vec!["start", "late"]);
}

#[test]
fn test_missing_and_bad_timestamps_skipped_with_window() {
    let records = vec![
        record("A", None),
        record("B", Some("not a date")),
        record("C", Some("2024-01-02")),
    ];

    let outcome = normalize(&records, Some(&window(1, 8)), ParsePolicy::Lenient).unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.skipped, 2);
    assert_eq!(outcome.unparseable, 1);
}

#[test]
fn test_no_window_passes_everything() {
    let records = vec![
        record("A", None),
        record("B", Some("not a date")),
        record("C", Some("1999-01-01")),
    ];

    let outcome = normalize(&records, None, ParsePolicy::Lenient).unwrap();

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.unparseable, 1);
    assert!(outcome.records[1].timestamp.is_none());
    assert!(outcome.records[2].timestamp.is_some());
    assert_eq!(outcome.records[0].metrics, records[0].metrics);
}

#[test]
fn test_strict_fails_on_unparseable() {
    let records = vec![record("A", Some("2024-01-02")), record("B", Some("soon"))];

    let result = normalize(&records, Some(&window(1, 8)), ParsePolicy::Strict);

    match result {
        Err(ParseError::InvalidTimestamp { entity, value }) => {
            assert_eq!(entity, "B");
            assert_eq!(value, "soon");
        }
        other => panic!("expected strict failure, got {:?}", other),
    }
}

#[test]
fn test_strict_tolerates_missing_timestamp() {
    let records = vec![record("A", None), record("B", Some("2024-01-02"))];

    let outcome = normalize(&records, Some(&window(1, 8)), ParsePolicy::Strict).unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.skipped, 1);
}

#[test]
fn test_input_is_not_mutated() {
    let records = vec![record("A", Some("2024-01-10"))];
    let before = records.clone();

    let _ = normalize(&records, Some(&window(1, 8)), ParsePolicy::Lenient).unwrap();

    assert_eq!(records, before);
}
