//! Filter command implementation.
//!
//! Writes the normalized, window-filtered records of one game (or of every
//! game) to a CSV file.

use super::models::FilterArgs;
use super::run::{load_config_sources, resolve_config};
use crate::normalizer::{normalize, NormalizedRecord};
use crate::output::{records_table, write_table};
use crate::pipeline::PipelineOptions;
use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};

/// Execute the filter command, returning the number of rows written
pub fn execute_filter(args: FilterArgs) -> Result<usize> {
    let config = resolve_config(&args.input)?;
    let options =
        PipelineOptions::from_config(&config, Utc::now()).context("Invalid configuration")?;

    let load = load_config_sources(&config)?;
    let normalized = normalize(&load.records, options.window.as_ref(), options.policy)
        .context("Failed to normalize timestamps")?;

    let records: Vec<NormalizedRecord> = normalized
        .records
        .into_iter()
        .filter(|r| args.game.as_deref().map_or(true, |game| r.entity == game))
        .collect();

    if records.is_empty() {
        warn!("No records matched the filter");
    }

    let metrics = options.or_observed_metrics(load.observed_metrics()).metrics;

    write_table(&records_table(&records, &metrics), &args.output)
        .context("Failed to write filtered records")?;

    info!(
        "✓ {} records written to: {}",
        records.len(),
        args.output.display()
    );

    Ok(records.len())
}

