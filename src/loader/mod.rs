//! Raw table loading and record extraction.
//!
//! This module handles:
//! - Reading platform CSV exports into raw tables
//! - Deriving entity labels from source names
//! - Turning table rows into entity-tagged metric records
//! - Platform column presets

pub mod platform;
pub mod records;
pub mod schema;
pub mod table;

// Re-export main types
pub use platform::Platform;
pub use records::{
    load_sources, load_tables, records_from_table, LoadOutcome, SkippedTable, TableRecords,
    TableSource,
};
pub use schema::{MetricRecord, RawTable, TableSchema};
pub use table::{discover_tables, entity_label_from_path, parse_table, read_table};
