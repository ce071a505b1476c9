//! Sum tracked metrics per entity.
//!
//! Values are summed in a canonical order (sorted with `f64::total_cmp`),
//! so totals are bit-identical for any permutation of the input records.

use crate::normalizer::NormalizedRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Totals for one entity across all of its records in the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEntity {
    pub entity: String,

    /// Number of records that contributed
    pub record_count: usize,

    /// Tracked metric -> sum
    pub metrics: BTreeMap<String, f64>,
}

impl AggregatedEntity {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            record_count: 0,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }
}

/// Drop repeated metric names, keeping first occurrences in order
pub fn dedup_metrics(metrics: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    metrics
        .iter()
        .filter(|m| seen.insert(m.as_str()))
        .cloned()
        .collect()
}

/// Order-independent sum
pub fn canonical_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().fold(0.0, |acc, v| acc + v)
}

/// Group records by entity and sum each tracked metric
///
/// **Public** - main entry point for aggregation
///
/// A record without a tracked metric contributes zero to it. The result has
/// exactly one row per distinct entity in `records`; rows come back sorted
/// by entity, though callers should not rely on any order.
pub fn aggregate_by_entity(
    records: &[NormalizedRecord],
    tracked: &[String],
) -> Vec<AggregatedEntity> {
    let tracked = dedup_metrics(tracked);

    debug!(
        "Aggregating {} records over {} metrics",
        records.len(),
        tracked.len()
    );

    // entity -> (record count, values per tracked metric)
    let mut groups: BTreeMap<&str, (usize, Vec<Vec<f64>>)> = BTreeMap::new();

    for record in records {
        let (count, values) = groups
            .entry(record.entity.as_str())
            .or_insert_with(|| (0, vec![Vec::new(); tracked.len()]));
        *count += 1;

        for (slot, metric) in values.iter_mut().zip(&tracked) {
            if let Some(value) = record.metrics.get(metric) {
                slot.push(*value);
            }
        }
    }

    let entities: Vec<AggregatedEntity> = groups
        .into_iter()
        .map(|(entity, (record_count, values))| AggregatedEntity {
            entity: entity.to_string(),
            record_count,
            metrics: tracked
                .iter()
                .cloned()
                .zip(values.into_iter().map(canonical_sum))
                .collect(),
        })
        .collect();

    debug!("Aggregated into {} entities", entities.len());

    entities
}
