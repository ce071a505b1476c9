//! End-to-end share-of-voice run over already-loaded records.
//!
//! Stages run strictly in order, each producing a new value:
//! normalize -> aggregate -> shares -> rollup. Parameter errors are raised
//! before any data is touched.

use crate::aggregator::{
    aggregate_by_entity, daily_trend, dedup_metrics, AggregatedEntity, TrendPoint,
};
use crate::loader::{LoadOutcome, SkippedTable};
use crate::normalizer::{normalize, ParsePolicy, RetentionWindow};
use crate::rollup::{rollup_per_metric, rollup_top_n, validate_rank, RollupResult};
use crate::share::{compute_shares, ShareTable};
use crate::utils::config::{PipelineConfig, REPORT_VERSION};
use crate::utils::error::{ConfigError, PipelineError};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Explicit parameters of one pipeline invocation
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Metrics to aggregate, in output column order
    pub metrics: Vec<String>,

    pub window: Option<RetentionWindow>,
    pub policy: ParsePolicy,

    pub rank_metric: String,
    pub top_n: usize,

    /// Also produce one rollup per tracked metric
    pub per_metric: bool,
}

impl PipelineOptions {
    pub fn new(metrics: Vec<String>, rank_metric: impl Into<String>, top_n: usize) -> Self {
        Self {
            metrics,
            window: None,
            policy: ParsePolicy::Lenient,
            rank_metric: rank_metric.into(),
            top_n,
            per_metric: false,
        }
    }

    pub fn with_window(mut self, window: RetentionWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fill in metrics the configuration left open
    ///
    /// An empty metric list becomes `observed`, and an empty ranking metric
    /// becomes the first tracked metric.
    pub fn or_observed_metrics(mut self, observed: Vec<String>) -> Self {
        if self.metrics.is_empty() {
            self.metrics = observed;
        }
        if self.rank_metric.is_empty() {
            if let Some(first) = self.metrics.first() {
                self.rank_metric = first.clone();
            }
        }
        self
    }

    /// Resolve a config file into options; `now` anchors lookback windows
    ///
    /// The ranking metric defaults to the first tracked metric.
    pub fn from_config(config: &PipelineConfig, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        let metrics = config.tracked_metrics();
        let rank_metric = config
            .rollup
            .rank_metric
            .clone()
            .or_else(|| metrics.first().cloned())
            .unwrap_or_default();

        let window = config
            .window
            .as_ref()
            .map(|w| w.resolve(now))
            .transpose()?;

        Ok(Self {
            metrics,
            window,
            policy: if config.strict {
                ParsePolicy::Strict
            } else {
                ParsePolicy::Lenient
            },
            rank_metric,
            top_n: config.rollup.top_n,
            per_metric: config.rollup.per_metric,
        })
    }
}

/// What was dropped along the way, for diagnostics only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub tables_loaded: usize,
    pub skipped_tables: Vec<SkippedTable>,
    pub skipped_rows: usize,
    pub skipped_cells: usize,

    pub records_loaded: usize,
    pub records_kept: usize,
    pub skipped_timestamps: usize,
    pub unparseable_timestamps: usize,
    pub outside_window: usize,

    pub warnings: Vec<String>,
}

/// Complete result of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SovReport {
    pub version: String,
    pub generated_at: String,
    pub window: Option<RetentionWindow>,
    pub tracked_metrics: Vec<String>,
    pub diagnostics: RunDiagnostics,
    pub aggregates: Vec<AggregatedEntity>,
    pub shares: ShareTable,
    pub rollup: RollupResult,
    #[serde(default)]
    pub per_metric_rollups: Vec<RollupResult>,
    #[serde(default)]
    pub trend: Vec<TrendPoint>,
}

/// Run every stage over the loaded records
///
/// **Public** - main entry point for library callers
///
/// # Errors
/// * `PipelineError::NoMetrics` - Nothing to track
/// * `PipelineError::InvalidRank` - Bad `top_n` or ranking metric
/// * `PipelineError::Parse` - Unparseable timestamp under strict policy
pub fn run_pipeline(
    load: &LoadOutcome,
    options: &PipelineOptions,
) -> Result<SovReport, PipelineError> {
    let metrics = dedup_metrics(&options.metrics);
    if metrics.is_empty() {
        return Err(PipelineError::NoMetrics);
    }
    validate_rank(&metrics, &options.rank_metric, options.top_n)?;

    if let Some(window) = &options.window {
        info!("Retention window: {}", window.describe());
    }

    let normalized = normalize(&load.records, options.window.as_ref(), options.policy)?;
    debug!("{} records inside the window", normalized.records.len());

    let aggregates = aggregate_by_entity(&normalized.records, &metrics);
    let shares = compute_shares(&aggregates, &metrics);
    let rollup = rollup_top_n(&shares, &options.rank_metric, options.top_n)?;

    let per_metric_rollups = if options.per_metric {
        rollup_per_metric(&shares, options.top_n)?
    } else {
        Vec::new()
    };

    let trend = daily_trend(&normalized.records, &metrics, None);

    let diagnostics = RunDiagnostics {
        tables_loaded: load.tables_loaded,
        skipped_tables: load.skipped_tables.clone(),
        skipped_rows: load.skipped_rows,
        skipped_cells: load.skipped_cells,
        records_loaded: load.records.len(),
        records_kept: normalized.records.len(),
        skipped_timestamps: normalized.skipped,
        unparseable_timestamps: normalized.unparseable,
        outside_window: normalized.outside_window,
        warnings: shares.warnings.iter().map(|w| w.to_string()).collect(),
    };

    Ok(SovReport {
        version: REPORT_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        window: options.window,
        tracked_metrics: metrics,
        diagnostics,
        aggregates,
        shares,
        rollup,
        per_metric_rollups,
        trend,
    })
}
