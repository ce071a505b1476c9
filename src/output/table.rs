//! Plain tabular views of pipeline artifacts.
//!
//! Column names here are the contract with chart renderers and exporters;
//! the CSV writer preserves them exactly.

use crate::aggregator::{AggregatedEntity, TrendPoint};
use crate::normalizer::NormalizedRecord;
use crate::rollup::RollupResult;
use crate::share::{ShareRow, ShareTable};
use crate::utils::config::{DATE_COLUMN, ENTITY_COLUMN, SHARE_PREFIX, TIME_COLUMN};
use serde::{Deserialize, Serialize};

/// Ordered columns and rows of cell text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell by row number and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }
}

/// Name of the share column for a metric
pub fn share_column(metric: &str) -> String {
    format!("{}{}", SHARE_PREFIX, metric)
}

/// Render a number for export; negative zero prints as "0"
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// `Game`, then one column per metric
pub fn aggregate_table(entities: &[AggregatedEntity], metrics: &[String]) -> Table {
    let mut table = Table::new(with_leading(ENTITY_COLUMN, metrics.iter().cloned()));
    for entity in entities {
        let mut row = vec![entity.entity.clone()];
        row.extend(metrics.iter().map(|m| format_value(entity.metric(m))));
        table.rows.push(row);
    }
    table
}

/// `Game`, one column per metric, then one `SoV_<metric>` column per metric
pub fn share_table(shares: &ShareTable) -> Table {
    share_rows_table(shares.rows.iter(), &shares.metrics)
}

/// Same layout as [`share_table`], Other last
pub fn rollup_table(rollup: &RollupResult, metrics: &[String]) -> Table {
    share_rows_table(rollup.rows(), metrics)
}

/// `Date`, then one column per metric
pub fn trend_table(points: &[TrendPoint], metrics: &[String]) -> Table {
    let mut table = Table::new(with_leading(DATE_COLUMN, metrics.iter().cloned()));
    for point in points {
        let mut row = vec![point.date.format("%Y-%m-%d").to_string()];
        row.extend(metrics.iter().map(|m| format_value(point.metric(m))));
        table.rows.push(row);
    }
    table
}

/// `Game`, `Time`, then one column per metric
pub fn records_table(records: &[NormalizedRecord], metrics: &[String]) -> Table {
    let mut columns = vec![ENTITY_COLUMN.to_string(), TIME_COLUMN.to_string()];
    columns.extend(metrics.iter().cloned());

    let mut table = Table::new(columns);
    for record in records {
        let mut row = vec![
            record.entity.clone(),
            record
                .timestamp
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        ];
        row.extend(metrics.iter().map(|m| format_value(record.metric(m))));
        table.rows.push(row);
    }
    table
}

fn share_rows_table<'a>(rows: impl Iterator<Item = &'a ShareRow>, metrics: &[String]) -> Table {
    let columns = with_leading(
        ENTITY_COLUMN,
        metrics
            .iter()
            .cloned()
            .chain(metrics.iter().map(|m| share_column(m))),
    );

    let mut table = Table::new(columns);
    for share_row in rows {
        let mut row = vec![share_row.entity.clone()];
        row.extend(metrics.iter().map(|m| format_value(share_row.metric(m))));
        row.extend(metrics.iter().map(|m| format_value(share_row.share(m))));
        table.rows.push(row);
    }
    table
}

fn with_leading(first: &str, rest: impl Iterator<Item = String>) -> Vec<String> {
    std::iter::once(first.to_string()).chain(rest).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(70.0), "70");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(12.5), "12.5");
    }

    #[test]
    fn test_aggregate_columns() {
        let metrics = vec!["View Count".to_string(), "Like Count".to_string()];
        let entities = vec![AggregatedEntity::new("A").with_metric("View Count", 3.0)];
        let table = aggregate_table(&entities, &metrics);

        assert_eq!(table.columns, vec!["Game", "View Count", "Like Count"]);
        assert_eq!(table.rows, vec![vec!["A", "3", "0"]]);
        assert_eq!(table.cell(0, "View Count"), Some("3"));
        assert_eq!(table.cell(1, "View Count"), None);
    }
}
