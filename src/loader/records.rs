//! Turn raw tables into entity-tagged metric records.
//!
//! A malformed table never aborts a load: it is logged, reported in the
//! [`LoadOutcome`], and the remaining tables still contribute records.

use super::schema::{MetricRecord, RawTable, TableSchema};
use super::table::{discover_tables, read_table};
use crate::utils::config::SourceConfig;
use crate::utils::error::LoadError;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A table that was left out of a load, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTable {
    pub name: String,
    pub reason: String,
}

/// Records extracted from one table
#[derive(Debug, Clone, Default)]
pub struct TableRecords {
    pub records: Vec<MetricRecord>,

    /// Rows dropped because no entity could be resolved
    pub skipped_rows: usize,

    /// Declared metric cells that were empty or not numeric
    pub skipped_cells: usize,
}

/// Unified result of loading many tables
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<MetricRecord>,
    pub tables_loaded: usize,
    pub skipped_tables: Vec<SkippedTable>,
    pub skipped_rows: usize,
    pub skipped_cells: usize,
}

impl LoadOutcome {
    fn absorb(&mut self, table: TableRecords) {
        self.tables_loaded += 1;
        self.skipped_rows += table.skipped_rows;
        self.skipped_cells += table.skipped_cells;
        self.records.extend(table.records);
    }

    /// Every metric name present in the loaded records, sorted
    pub fn observed_metrics(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|r| r.metrics.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    fn skip(&mut self, name: String, err: &LoadError) {
        warn!("Skipping table {}: {}", name, err);
        self.skipped_tables.push(SkippedTable {
            name,
            reason: err.to_string(),
        });
    }
}

/// A source path together with how to interpret its tables
#[derive(Debug, Clone)]
pub struct TableSource {
    pub path: PathBuf,
    pub schema: TableSchema,

    /// Overrides the label derived from each file name
    pub label: Option<String>,
}

impl From<&SourceConfig> for TableSource {
    fn from(config: &SourceConfig) -> Self {
        Self {
            path: config.path.clone(),
            schema: config.schema(),
            label: config.label.clone(),
        }
    }
}

/// Extract metric records from one raw table
///
/// # Errors
/// * `LoadError::Malformed` - A row's width differs from the header
pub fn records_from_table(
    table: &RawTable,
    schema: &TableSchema,
) -> Result<TableRecords, LoadError> {
    let timestamp_idx = locate(table, schema.timestamp_column.as_deref());
    let entity_idx = locate(table, schema.entity_column.as_deref());

    let metric_columns: Vec<(String, Option<usize>)> = match &schema.metric_columns {
        Some(names) => names
            .iter()
            .map(|name| (name.clone(), table.headers.iter().position(|h| h == name)))
            .collect(),
        None => table
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, header)| {
                !header.is_empty() && Some(*idx) != timestamp_idx && Some(*idx) != entity_idx
            })
            .map(|(idx, header)| (header.clone(), Some(idx)))
            .collect(),
    };
    let explicit = schema.metric_columns.is_some();

    for (name, idx) in &metric_columns {
        if idx.is_none() {
            debug!("Table {} has no column '{}'", table.name, name);
        }
    }

    let mut out = TableRecords::default();

    for (row_number, row) in table.rows.iter().enumerate() {
        if row.len() != table.headers.len() {
            return Err(LoadError::Malformed {
                name: table.name.clone(),
                reason: format!(
                    "row {} has {} cells, header has {}",
                    row_number + 1,
                    row.len(),
                    table.headers.len()
                ),
            });
        }

        let entity = entity_idx
            .map(|idx| row[idx].trim())
            .filter(|value| !value.is_empty())
            .unwrap_or(table.label.as_str());

        if entity.is_empty() {
            out.skipped_rows += 1;
            continue;
        }

        let mut record = MetricRecord::new(entity);
        record.timestamp = timestamp_idx
            .map(|idx| row[idx].trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        for (name, idx) in &metric_columns {
            let Some(idx) = idx else { continue };
            match parse_metric(&row[*idx]) {
                Some(value) => {
                    record.metrics.insert(name.clone(), value);
                }
                None if explicit => {
                    debug!(
                        "Table {} row {}: '{}' is not numeric for {}",
                        table.name,
                        row_number + 1,
                        row[*idx],
                        name
                    );
                    out.skipped_cells += 1;
                }
                // Text columns (titles, tweet bodies) are not metrics
                None => {}
            }
        }

        if let Some(count) = &schema.count_metric {
            record.metrics.insert(count.clone(), 1.0);
        }

        out.records.push(record);
    }

    Ok(out)
}

/// Unify already-read tables into one record sequence
pub fn load_tables(tables: &[(RawTable, TableSchema)]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for (table, schema) in tables {
        match records_from_table(table, schema) {
            Ok(records) => outcome.absorb(records),
            Err(e) => outcome.skip(table.name.clone(), &e),
        }
    }

    debug!(
        "Loaded {} records from {} tables",
        outcome.records.len(),
        outcome.tables_loaded
    );

    outcome
}

/// Read every table named by the sources and unify their records
///
/// **Public** - main entry point for loading from disk
pub fn load_sources(sources: &[TableSource]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for source in sources {
        let paths = match discover_tables(&source.path) {
            Ok(paths) => paths,
            Err(e) => {
                outcome.skip(source.path.display().to_string(), &e);
                continue;
            }
        };

        for path in paths {
            let loaded = read_table(&path).and_then(|mut table| {
                if let Some(label) = &source.label {
                    table.label = label.clone();
                }
                records_from_table(&table, &source.schema)
            });

            match loaded {
                Ok(records) => outcome.absorb(records),
                Err(e) => outcome.skip(path.display().to_string(), &e),
            }
        }
    }

    info!(
        "Loaded {} records from {} tables ({} skipped)",
        outcome.records.len(),
        outcome.tables_loaded,
        outcome.skipped_tables.len()
    );

    outcome
}

fn locate(table: &RawTable, column: Option<&str>) -> Option<usize> {
    let column = column?;
    let idx = table.headers.iter().position(|h| h == column);
    if idx.is_none() {
        warn!("Table {} has no '{}' column", table.name, column);
    }
    idx
}

fn parse_metric(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric(" 42 "), Some(42.0));
        assert_eq!(parse_metric("1.5"), Some(1.5));
        assert_eq!(parse_metric(""), None);
        assert_eq!(parse_metric("NaN"), None);
        assert_eq!(parse_metric("inf"), None);
        assert_eq!(parse_metric("lots"), None);
    }
}
