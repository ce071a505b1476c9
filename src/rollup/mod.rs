//! Top-N plus "Other" rollups of share tables.

pub mod top_n;

pub use top_n::{rollup_per_metric, rollup_top_n, validate_rank, RollupResult};
