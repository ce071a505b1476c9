//! Aggregation of normalized records.
//!
//! This module transforms normalized records into:
//! - Per-entity metric totals (input to share-of-voice)
//! - Per-day trend series for a single game or the whole field

pub mod totals;
pub mod trend;

// Re-export main types and functions
pub use totals::{aggregate_by_entity, canonical_sum, dedup_metrics, AggregatedEntity};
pub use trend::{daily_trend, TrendPoint};
