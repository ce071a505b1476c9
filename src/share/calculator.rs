//! Percentage shares of population totals.
//!
//! `share = 100 * value / population_total`. A metric whose total is zero
//! gets a share of exactly 0.0 for every entity; that case is logged and
//! recorded as a [`DivisionPolicyWarning`] instead of producing NaN.

use crate::aggregator::{canonical_sum, dedup_metrics, AggregatedEntity};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An aggregated entity plus its share of every tracked metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRow {
    pub entity: String,
    pub record_count: usize,

    /// Tracked metric -> sum
    pub metrics: BTreeMap<String, f64>,

    /// Tracked metric -> percentage of the population total
    pub shares: BTreeMap<String, f64>,
}

impl ShareRow {
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }

    pub fn share(&self, name: &str) -> f64 {
        self.shares.get(name).copied().unwrap_or(0.0)
    }
}

/// Non-fatal notice that a metric's population total was zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionPolicyWarning {
    pub metric: String,
}

impl fmt::Display for DivisionPolicyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "population total of '{}' is zero; every share set to 0",
            self.metric
        )
    }
}

/// Share rows for a whole population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareTable {
    /// Tracked metrics, in column order
    pub metrics: Vec<String>,

    /// Metric -> sum across all entities
    pub totals: BTreeMap<String, f64>,

    pub rows: Vec<ShareRow>,

    pub warnings: Vec<DivisionPolicyWarning>,
}

impl ShareTable {
    pub fn total(&self, metric: &str) -> f64 {
        self.totals.get(metric).copied().unwrap_or(0.0)
    }

    pub fn row(&self, entity: &str) -> Option<&ShareRow> {
        self.rows.iter().find(|r| r.entity == entity)
    }

    pub fn tracks(&self, metric: &str) -> bool {
        self.metrics.iter().any(|m| m == metric)
    }
}

/// Percentage of `total`, or 0.0 when the total is zero
pub fn safe_share(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        100.0 * value / total
    }
}

/// Sum of each metric across all entities
pub fn population_totals(
    entities: &[AggregatedEntity],
    metrics: &[String],
) -> BTreeMap<String, f64> {
    metrics
        .iter()
        .map(|metric| {
            let values = entities.iter().map(|e| e.metric(metric)).collect();
            (metric.clone(), canonical_sum(values))
        })
        .collect()
}

/// Compute every entity's share of every tracked metric
///
/// **Public** - main entry point for share-of-voice
///
/// Rows keep the input order and every input field.
pub fn compute_shares(entities: &[AggregatedEntity], tracked: &[String]) -> ShareTable {
    let metrics = dedup_metrics(tracked);
    let totals = population_totals(entities, &metrics);

    let warnings: Vec<DivisionPolicyWarning> = metrics
        .iter()
        .filter(|metric| totals.get(metric.as_str()).copied().unwrap_or(0.0) == 0.0)
        .map(|metric| DivisionPolicyWarning {
            metric: metric.clone(),
        })
        .collect();

    for warning in &warnings {
        warn!("{}", warning);
    }

    let rows = entities
        .iter()
        .map(|entity| ShareRow {
            entity: entity.entity.clone(),
            record_count: entity.record_count,
            metrics: metrics
                .iter()
                .map(|m| (m.clone(), entity.metric(m)))
                .collect(),
            shares: metrics
                .iter()
                .map(|m| {
                    let total = totals.get(m.as_str()).copied().unwrap_or(0.0);
                    (m.clone(), safe_share(entity.metric(m), total))
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    debug!(
        "Computed shares for {} entities over {} metrics",
        rows.len(),
        metrics.len()
    );

    ShareTable {
        metrics,
        totals,
        rows,
        warnings,
    }
}
