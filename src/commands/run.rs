//! Run command implementation.
//!
//! The run command:
//! 1. Resolves configuration (file plus CLI overrides)
//! 2. Loads every source table
//! 3. Runs the share-of-voice pipeline
//! 4. Writes the JSON report
//! 5. Writes CSV tables (if requested)

use super::models::{InputArgs, RunArgs};
use super::utils::render_summary;
use crate::loader::{load_sources, LoadOutcome, TableSource};
use crate::output::{
    aggregate_table, rollup_table, share_table, trend_table, write_report, write_table,
};
use crate::pipeline::{run_pipeline, PipelineOptions, SovReport};
use crate::utils::config::{
    load_config, PipelineConfig, SourceConfig, WindowConfig, MAX_TOP_N, SHARE_PREFIX,
};
use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Execute the run command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Config file missing or invalid
/// * No table could be loaded
/// * Bad rollup parameters or strict timestamp failure
/// * File write errors
pub fn execute_run(args: RunArgs) -> Result<SovReport> {
    let start_time = Instant::now();

    info!("Step 1/5: Resolving configuration...");
    let config = resolve_config(&args.input)?;
    let options = resolve_options(&config, &args)?;

    info!("Step 2/5: Loading {} sources...", config.sources.len());
    let load = load_config_sources(&config)?;
    let options = options.or_observed_metrics(load.observed_metrics());

    debug!(
        "Tracking {} metrics, ranking by '{}', top {}",
        options.metrics.len(),
        options.rank_metric,
        options.top_n
    );

    info!("Step 3/5: Computing share of voice...");
    let report = run_pipeline(&load, &options).context("Share-of-voice pipeline failed")?;

    info!(
        "Aggregated {} entities from {} records",
        report.aggregates.len(),
        report.diagnostics.records_kept
    );

    info!("Step 4/5: Writing report...");
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    match &args.csv_dir {
        Some(dir) => {
            info!("Step 5/5: Writing CSV tables...");
            write_csv_tables(&report, dir)?;
        }
        None => info!("Step 5/5: Skipping CSV export (not requested)"),
    }

    if args.print_summary {
        println!("{}", render_summary(&report));
    }

    let elapsed = start_time.elapsed();
    info!("Run completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Validate run arguments
///
/// **Public** - can be called before execute_run for early validation
pub fn validate_args(args: &RunArgs) -> Result<()> {
    validate_input(&args.input)?;

    if let Some(top_n) = args.top_n {
        if top_n == 0 {
            anyhow::bail!("top_n must be greater than 0");
        }
        if top_n > MAX_TOP_N {
            anyhow::bail!("top_n is too large (max {})", MAX_TOP_N);
        }
    }

    if let Some(rank) = &args.rank_metric {
        if rank.trim().is_empty() {
            anyhow::bail!("Ranking metric cannot be empty");
        }
    }

    Ok(())
}

/// Validate input arguments shared by run and filter
pub fn validate_input(input: &InputArgs) -> Result<()> {
    if input.config.is_none() && input.inputs.is_empty() {
        anyhow::bail!("Provide a config file or at least one input path");
    }

    if input.start.is_some() && input.lookback_days.is_some() {
        anyhow::bail!("Use either a window start or lookback days, not both");
    }

    if input.end.is_some() && input.start.is_none() && input.lookback_days.is_none() {
        anyhow::bail!("A window end needs a start or lookback days");
    }

    Ok(())
}

/// Load the config file (if any) and apply CLI overrides
///
/// **Public** - shared by run and filter
pub fn resolve_config(input: &InputArgs) -> Result<PipelineConfig> {
    let mut config = match &input.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    for path in &input.inputs {
        let mut source = SourceConfig::new(path, input.platform);
        source.label = input.label.clone();
        config.sources.push(source);
    }

    if input.has_window_override() {
        config.window = Some(WindowConfig {
            start: input.start.clone(),
            end: input.end.clone(),
            lookback_days: input.lookback_days,
        });
    }

    if input.strict {
        config.strict = true;
    }

    if !input.metrics.is_empty() {
        config.metrics = input.metrics.clone();
    }

    if config.sources.is_empty() {
        anyhow::bail!("No sources configured");
    }

    Ok(config)
}

/// Load every configured source, failing only when nothing loads
pub fn load_config_sources(config: &PipelineConfig) -> Result<LoadOutcome> {
    let sources: Vec<TableSource> = config.sources.iter().map(TableSource::from).collect();
    let load = load_sources(&sources);

    if load.tables_loaded == 0 {
        anyhow::bail!(
            "No tables could be loaded ({} skipped)",
            load.skipped_tables.len()
        );
    }

    Ok(load)
}

fn resolve_options(config: &PipelineConfig, args: &RunArgs) -> Result<PipelineOptions> {
    let mut options =
        PipelineOptions::from_config(config, Utc::now()).context("Invalid configuration")?;

    if let Some(rank) = &args.rank_metric {
        options.rank_metric = rank.clone();
    }
    if let Some(top_n) = args.top_n {
        options.top_n = top_n;
    }
    if args.per_metric {
        options.per_metric = true;
    }

    Ok(options)
}

/// Write every report table as CSV into `dir`
///
/// Files: `aggregate.csv`, `shares.csv`, `rollup.csv`, `trend.csv`, and one
/// `SoV_<metric>.csv` per-metric rollup.
pub fn write_csv_tables(report: &SovReport, dir: &Path) -> Result<()> {
    let metrics = &report.tracked_metrics;

    write_table(&aggregate_table(&report.aggregates, metrics), dir.join("aggregate.csv"))
        .context("Failed to write aggregate table")?;
    write_table(&share_table(&report.shares), dir.join("shares.csv"))
        .context("Failed to write share table")?;
    write_table(&rollup_table(&report.rollup, metrics), dir.join("rollup.csv"))
        .context("Failed to write rollup table")?;
    write_table(&trend_table(&report.trend, metrics), dir.join("trend.csv"))
        .context("Failed to write trend table")?;

    for rollup in &report.per_metric_rollups {
        let file_name = format!("{}{}.csv", SHARE_PREFIX, file_safe(&rollup.rank_metric));
        write_table(&rollup_table(rollup, metrics), dir.join(&file_name))
            .with_context(|| format!("Failed to write {}", file_name))?;
    }

    Ok(())
}

/// Metric names become file names; keep them portable
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '(' | ')') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
