//! Per-day trend series.
//!
//! Buckets records by UTC calendar day, the series behind the
//! "trend over time" line charts.

use super::totals::{canonical_sum, dedup_metrics};
use crate::normalizer::NormalizedRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub record_count: usize,
    pub metrics: BTreeMap<String, f64>,
}

impl TrendPoint {
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }
}

/// Sum tracked metrics per day, ascending by date
///
/// With `entity` set only that entity's records count. Records without a
/// timestamp cannot be placed on a day and are ignored.
pub fn daily_trend(
    records: &[NormalizedRecord],
    tracked: &[String],
    entity: Option<&str>,
) -> Vec<TrendPoint> {
    let tracked = dedup_metrics(tracked);
    let mut days: BTreeMap<NaiveDate, (usize, Vec<Vec<f64>>)> = BTreeMap::new();

    let selected = records
        .iter()
        .filter(|r| entity.map_or(true, |wanted| r.entity == wanted));

    for record in selected {
        let Some(at) = record.timestamp else { continue };
        let (count, values) = days
            .entry(at.date_naive())
            .or_insert_with(|| (0, vec![Vec::new(); tracked.len()]));
        *count += 1;

        for (slot, metric) in values.iter_mut().zip(&tracked) {
            if let Some(value) = record.metrics.get(metric) {
                slot.push(*value);
            }
        }
    }

    days.into_iter()
        .map(|(date, (record_count, values))| TrendPoint {
            date,
            record_count,
            metrics: tracked
                .iter()
                .cloned()
                .zip(values.into_iter().map(canonical_sum))
                .collect(),
        })
        .collect()
}
