use pretty_assertions::assert_eq;
use std::fs;
use sov_studio::loader::{
    load_sources, load_tables, parse_table, read_table, records_from_table, Platform, RawTable,
    TableSchema, TableSource,
};
use sov_studio::utils::LoadError;

const YOUTUBE_CSV: &str = "\
Video ID,Published Date,Title,View Count,Like Count,Comment Count,Channel Title,Subscriber Count
v1,2024-01-02T10:00:00Z,Launch trailer,1000,50,5,Studio,2000
v2,2024-01-03T10:00:00Z,Patch notes,250,,1,Studio,2000
";

fn youtube_table(label: &str) -> RawTable {
    parse_table("mem", label, YOUTUBE_CSV.as_bytes()).unwrap()
}

#[test]
fn test_records_carry_table_label() {
    let table = youtube_table("Axie_Infinity");
    let out = records_from_table(&table, &Platform::Youtube.schema()).unwrap();

    assert_eq!(out.records.len(), 2);
    assert!(out.records.iter().all(|r| r.entity == "Axie_Infinity"));
    assert_eq!(out.records[0].metrics["View Count"], 1000.0);
    assert_eq!(
        out.records[0].timestamp.as_deref(),
        Some("2024-01-02T10:00:00Z")
    );
}

#[test]
fn test_empty_metric_cell_is_missing() {
    let table = youtube_table("Axie_Infinity");
    let out = records_from_table(&table, &Platform::Youtube.schema()).unwrap();

    assert!(!out.records[1].metrics.contains_key("Like Count"));
    assert_eq!(out.skipped_cells, 1);
}

#[test]
fn test_implicit_metrics_are_numeric_columns() {
    let table = youtube_table("Axie_Infinity");
    let schema = TableSchema {
        timestamp_column: Some("Published Date".to_string()),
        ..Default::default()
    };
    let out = records_from_table(&table, &schema).unwrap();

    let first = &out.records[0];
    assert!(first.metrics.contains_key("View Count"));
    assert!(first.metrics.contains_key("Subscriber Count"));
    assert!(!first.metrics.contains_key("Title"));
    assert!(!first.metrics.contains_key("Published Date"));
    assert_eq!(out.skipped_cells, 0);
}

#[test]
fn test_entity_column_overrides_label() {
    let content = "Query,Date,Tweet Count\nAxie,2024-11-10,120\n,2024-11-10,7\nPixels,2024-11-10,80\n";
    let table = parse_table("daily", "Data_pull", content.as_bytes()).unwrap();
    let out = records_from_table(&table, &Platform::TwitterCounts.schema()).unwrap();

    let entities: Vec<&str> = out.records.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(entities, vec!["Axie", "Data_pull", "Pixels"]);
}

#[test]
fn test_rows_without_entity_are_skipped() {
    let content = "Date,Tweet Count\n2024-11-10,3\n";
    let table = parse_table("anon", "", content.as_bytes()).unwrap();
    let out = records_from_table(&table, &TableSchema::default()).unwrap();

    assert!(out.records.is_empty());
    assert_eq!(out.skipped_rows, 1);
}

#[test]
fn test_count_metric_counts_records() {
    let content = "Time,User,Tweet,Retweet Count,Likes Count\n\
                   2024-09-04 12:00:00+00:00,1,gm,3,10\n\
                   2024-09-04 13:00:00+00:00,2,wagmi,0,4\n";
    let table = parse_table("tweets", "Pixels", content.as_bytes()).unwrap();
    let out = records_from_table(&table, &Platform::Twitter.schema()).unwrap();

    assert!(out.records.iter().all(|r| r.metrics["Tweet Count"] == 1.0));
}

#[test]
fn test_ragged_in_memory_table_is_malformed() {
    let table = RawTable {
        name: "bad".to_string(),
        label: "Game".to_string(),
        headers: vec!["a".to_string(), "b".to_string()],
        rows: vec![vec!["1".to_string()]],
    };
    let result = records_from_table(&table, &TableSchema::default());
    assert!(matches!(result, Err(LoadError::Malformed { .. })));
}

#[test]
fn test_load_tables_skips_malformed_table() {
    let good = youtube_table("Good");
    let bad = RawTable {
        name: "bad".to_string(),
        label: "Bad".to_string(),
        headers: vec!["View Count".to_string()],
        rows: vec![vec!["1".to_string(), "2".to_string()]],
    };
    let schema = Platform::Youtube.schema();

    let outcome = load_tables(&[(bad, schema.clone()), (good, schema)]);

    assert_eq!(outcome.tables_loaded, 1);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.skipped_tables.len(), 1);
    assert_eq!(outcome.skipped_tables[0].name, "bad");
}

#[test]
fn test_read_table_missing_file() {
    let result = read_table("/definitely/not/here.csv");
    assert!(matches!(result, Err(LoadError::Unreadable { .. })));
}

#[test]
fn test_load_sources_directory_with_broken_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Axie_Infinity.csv"), YOUTUBE_CSV).unwrap();
    fs::write(dir.path().join("Pixels (1).csv"), YOUTUBE_CSV).unwrap();
    fs::write(dir.path().join("Broken.csv"), "View Count\n1,2,3\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let source = TableSource {
        path: dir.path().to_path_buf(),
        schema: Platform::Youtube.schema(),
        label: None,
    };
    let outcome = load_sources(&[source]);

    assert_eq!(outcome.tables_loaded, 2);
    assert_eq!(outcome.skipped_tables.len(), 1);
    assert!(outcome.skipped_tables[0].name.ends_with("Broken.csv"));

    let mut entities: Vec<&str> = outcome.records.iter().map(|r| r.entity.as_str()).collect();
    entities.dedup();
    assert_eq!(entities, vec!["Axie_Infinity", "Pixels"]);
}

#[test]
fn test_load_sources_label_override_and_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("export.csv");
    fs::write(&file, YOUTUBE_CSV).unwrap();

    let sources = vec![
        TableSource {
            path: file,
            schema: Platform::Youtube.schema(),
            label: Some("Ronin".to_string()),
        },
        TableSource {
            path: dir.path().join("gone.csv"),
            schema: Platform::Youtube.schema(),
            label: None,
        },
    ];
    let outcome = load_sources(&sources);

    assert_eq!(outcome.tables_loaded, 1);
    assert_eq!(outcome.skipped_tables.len(), 1);
    assert!(outcome.records.iter().all(|r| r.entity == "Ronin"));
}

#[test]
fn test_empty_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let source = TableSource {
        path: dir.path().to_path_buf(),
        schema: TableSchema::default(),
        label: None,
    };
    let outcome = load_sources(&[source]);

    assert_eq!(outcome.tables_loaded, 0);
    assert_eq!(outcome.skipped_tables.len(), 1);
}
