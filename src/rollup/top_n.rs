//! Rank entities by one metric, keep the top N, fold the rest into "Other".
//!
//! The Other row is always emitted, even when every entity fits in the top
//! N, so consumers see the same row layout regardless of input size.

use crate::aggregator::canonical_sum;
use crate::share::{safe_share, ShareRow, ShareTable};
use crate::utils::config::{MAX_TOP_N, OTHER_LABEL};
use crate::utils::error::InvalidRankError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Ranked top rows followed by a synthetic remainder row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupResult {
    pub rank_metric: String,
    pub top_n: usize,

    /// Highest-ranked rows, descending
    pub kept: Vec<ShareRow>,

    /// Everything not kept, summed
    pub other: ShareRow,
}

impl RollupResult {
    /// Kept rows then Other
    pub fn rows(&self) -> impl Iterator<Item = &ShareRow> {
        self.kept.iter().chain(std::iter::once(&self.other))
    }

    /// Always `kept.len() + 1`
    pub fn row_count(&self) -> usize {
        self.kept.len() + 1
    }
}

/// Check rollup parameters before any work is done
///
/// # Errors
/// * `InvalidRankError::ZeroCount` - `top_n` is 0
/// * `InvalidRankError::CountTooLarge` - `top_n` exceeds `MAX_TOP_N`
/// * `InvalidRankError::UnknownMetric` - `rank_metric` is not tracked
pub fn validate_rank(
    metrics: &[String],
    rank_metric: &str,
    top_n: usize,
) -> Result<(), InvalidRankError> {
    if top_n == 0 {
        return Err(InvalidRankError::ZeroCount);
    }
    if top_n > MAX_TOP_N {
        return Err(InvalidRankError::CountTooLarge {
            requested: top_n,
            max: MAX_TOP_N,
        });
    }
    if !metrics.iter().any(|m| m == rank_metric) {
        return Err(InvalidRankError::UnknownMetric(rank_metric.to_string()));
    }
    Ok(())
}

/// Roll a share table up to its top `top_n` entities plus "Other"
///
/// **Public** - main entry point for rollups
///
/// Rows are ranked by `rank_metric` descending, ties broken by entity name
/// ascending. For every metric, Other holds the population total minus the
/// kept rows' sum, computed as the sum of the rows that were not kept.
pub fn rollup_top_n(
    table: &ShareTable,
    rank_metric: &str,
    top_n: usize,
) -> Result<RollupResult, InvalidRankError> {
    validate_rank(&table.metrics, rank_metric, top_n)?;

    if table.rows.iter().any(|r| r.entity == OTHER_LABEL) {
        warn!(
            "An input entity is named '{}'; it is ranked like any other entity",
            OTHER_LABEL
        );
    }

    let mut ranked: Vec<&ShareRow> = table.rows.iter().collect();
    ranked.sort_by(|a, b| rank_order(a, b, rank_metric));

    let split = top_n.min(ranked.len());
    let (kept, rest) = ranked.split_at(split);

    debug!(
        "Rollup by '{}': keeping {} of {} entities",
        rank_metric,
        kept.len(),
        ranked.len()
    );

    Ok(RollupResult {
        rank_metric: rank_metric.to_string(),
        top_n,
        kept: kept.iter().map(|row| (*row).clone()).collect(),
        other: other_row(table, rest),
    })
}

/// One rollup per tracked metric, in tracked order
pub fn rollup_per_metric(
    table: &ShareTable,
    top_n: usize,
) -> Result<Vec<RollupResult>, InvalidRankError> {
    table
        .metrics
        .iter()
        .map(|metric| rollup_top_n(table, metric, top_n))
        .collect()
}

fn rank_order(a: &ShareRow, b: &ShareRow, rank_metric: &str) -> Ordering {
    b.metric(rank_metric)
        .total_cmp(&a.metric(rank_metric))
        .then_with(|| a.entity.cmp(&b.entity))
}

fn other_row(table: &ShareTable, rest: &[&ShareRow]) -> ShareRow {
    let mut metrics = BTreeMap::new();
    let mut shares = BTreeMap::new();

    for metric in &table.metrics {
        let value = canonical_sum(rest.iter().map(|r| r.metric(metric)).collect());
        metrics.insert(metric.clone(), value);
        shares.insert(metric.clone(), safe_share(value, table.total(metric)));
    }

    ShareRow {
        entity: OTHER_LABEL.to_string(),
        record_count: rest.iter().map(|r| r.record_count).sum(),
        metrics,
        shares,
    }
}
