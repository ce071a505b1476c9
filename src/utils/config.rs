//! Configuration and constants for the pipeline and CLI.
//!
//! A run is described by a [`PipelineConfig`], usually read from a TOML file:
//!
//! ```toml
//! metrics = ["View Count", "Like Count"]
//!
//! [window]
//! start = "2024-01-01"
//! end = "2024-01-08"
//!
//! [rollup]
//! rank_metric = "View Count"
//! top_n = 9
//!
//! [[sources]]
//! path = "csvs/youtube"
//! platform = "youtube"
//! ```

use crate::loader::{Platform, TableSchema};
use crate::normalizer::{parse_timestamp, RetentionWindow};
use crate::utils::error::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Nine named entities plus "Other" in every rollup by default
pub const DEFAULT_TOP_N: usize = 9;
pub const MAX_TOP_N: usize = 1000;

// Column and row labels shared by every exported table
pub const ENTITY_COLUMN: &str = "Game";
pub const DATE_COLUMN: &str = "Date";
pub const TIME_COLUMN: &str = "Time";
pub const SHARE_PREFIX: &str = "SoV_";
pub const OTHER_LABEL: &str = "Other";

/// Shares of a metric with a nonzero total must sum to 100 within this bound
pub const SHARE_SUM_TOLERANCE: f64 = 1e-6;

// Timestamp layouts found in platform exports, tried in order.
// RFC 3339 is attempted before any of these.
pub const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%z",
];
pub const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];
// "%m-%d-%y" goes first: "%Y" would read "02-06-23" as the year 2.
pub const DATE_FORMATS: &[&str] = &["%m-%d-%y", "%Y-%m-%d", "%m/%d/%Y"];

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Metrics to aggregate; empty means "every metric the sources declare"
    #[serde(default)]
    pub metrics: Vec<String>,

    /// Retention window (optional)
    #[serde(default)]
    pub window: Option<WindowConfig>,

    /// Fail on unparseable timestamps instead of skipping them
    #[serde(default)]
    pub strict: bool,

    /// Rollup parameters
    #[serde(default)]
    pub rollup: RollupConfig,

    /// Input tables
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Retention window as written in config
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WindowConfig {
    /// Inclusive start
    pub start: Option<String>,

    /// Exclusive end
    pub end: Option<String>,

    /// Trailing window length, used when `start` is absent
    pub lookback_days: Option<u32>,
}

/// Rollup parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RollupConfig {
    /// Metric to rank by (defaults to the first tracked metric)
    pub rank_metric: Option<String>,

    /// Number of entities kept before "Other"
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Also roll up by every tracked metric
    #[serde(default)]
    pub per_metric: bool,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            rank_metric: None,
            top_n: DEFAULT_TOP_N,
            per_metric: false,
        }
    }
}

/// One input path (file or directory of CSV files)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub path: PathBuf,

    /// Column preset; explicit fields below override it
    #[serde(default)]
    pub platform: Platform,

    /// Entity label for every table of this source (defaults to the file name)
    pub label: Option<String>,

    pub timestamp_column: Option<String>,
    pub entity_column: Option<String>,
    pub metrics: Option<Vec<String>>,
    pub count_metric: Option<String>,
}

impl SourceConfig {
    pub fn new(path: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            path: path.into(),
            platform,
            label: None,
            timestamp_column: None,
            entity_column: None,
            metrics: None,
            count_metric: None,
        }
    }

    /// Platform preset with this source's overrides applied
    pub fn schema(&self) -> TableSchema {
        let mut schema = self.platform.schema();
        if let Some(column) = &self.timestamp_column {
            schema.timestamp_column = Some(column.clone());
        }
        if let Some(column) = &self.entity_column {
            schema.entity_column = Some(column.clone());
        }
        if let Some(metrics) = &self.metrics {
            schema.metric_columns = Some(metrics.clone());
        }
        if let Some(count) = &self.count_metric {
            schema.count_metric = Some(count.clone());
        }
        schema
    }
}

impl WindowConfig {
    /// Resolve into a concrete window; `now` anchors a lookback without an end
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<RetentionWindow, ConfigError> {
        let end = self
            .end
            .as_deref()
            .map(|raw| parse_bound("end", raw))
            .transpose()?;

        match (&self.start, self.lookback_days) {
            (Some(raw), _) => RetentionWindow::new(parse_bound("start", raw)?, end),
            (None, Some(days)) => RetentionWindow::trailing_days(end.unwrap_or(now), days),
            (None, None) => Err(ConfigError::InvalidWindow(
                "window needs either a start or lookback_days".to_string(),
            )),
        }
    }
}

fn parse_bound(which: &str, raw: &str) -> Result<DateTime<Utc>, ConfigError> {
    parse_timestamp(raw)
        .ok_or_else(|| ConfigError::InvalidWindow(format!("cannot parse {} '{}'", which, raw)))
}

impl PipelineConfig {
    /// Metrics to track for this run, duplicates removed, order kept
    pub fn tracked_metrics(&self) -> Vec<String> {
        let declared: Vec<String> = if self.metrics.is_empty() {
            self.sources
                .iter()
                .flat_map(|source| source.schema().declared_metrics())
                .collect()
        } else {
            self.metrics.clone()
        };

        crate::aggregator::dedup_metrics(&declared)
    }
}

/// Load pipeline configuration from a TOML file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&contents)?;
    Ok(config)
}
