//! Record and table definitions shared by the loader and later stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of source data, tagged with its owning entity
///
/// Metric sets differ per platform, so values are kept by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Entity identifier (game); never empty
    pub entity: String,

    /// Raw timestamp text as found in the source
    pub timestamp: Option<String>,

    /// Metric name -> value
    pub metrics: BTreeMap<String, f64>,
}

impl MetricRecord {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            timestamp: None,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }
}

/// A raw table exactly as read from a source, before interpretation
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Source name (usually the file path)
    pub name: String,

    /// Entity label derived from the source name
    pub label: String,

    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Which columns of a raw table carry what
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Column holding the record timestamp
    pub timestamp_column: Option<String>,

    /// Column whose non-empty value overrides the table label
    pub entity_column: Option<String>,

    /// Explicit metric columns; `None` means every numeric cell counts
    pub metric_columns: Option<Vec<String>>,

    /// Metric that receives 1 for every record
    pub count_metric: Option<String>,
}

impl TableSchema {
    /// Metrics this schema promises, in declaration order
    pub fn declared_metrics(&self) -> Vec<String> {
        let mut metrics = self.metric_columns.clone().unwrap_or_default();
        if let Some(count) = &self.count_metric {
            metrics.push(count.clone());
        }
        metrics
    }
}
