//! Record normalization against a retention window.

use super::timestamp::parse_timestamp;
use super::window::RetentionWindow;
use crate::loader::MetricRecord;
use crate::utils::error::ParseError;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How unparseable timestamps are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsePolicy {
    /// Skip the record and count it
    #[default]
    Lenient,
    /// Fail the run on the first unparseable timestamp
    Strict,
}

/// A record whose timestamp has been parsed into UTC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub entity: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub metrics: BTreeMap<String, f64>,
}

impl NormalizedRecord {
    pub fn new(entity: impl Into<String>, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            entity: entity.into(),
            timestamp,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Value of a metric; a missing metric contributes zero
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }
}

/// Normalized records plus diagnostics about what was left out
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub records: Vec<NormalizedRecord>,

    /// Records dropped for a missing or unparseable timestamp
    pub skipped: usize,

    /// Records with a valid timestamp outside the window
    pub outside_window: usize,

    /// Timestamps that failed to parse, whether or not the record was kept
    pub unparseable: usize,
}

/// Parse timestamps and keep the records inside `window`
///
/// **Public** - main entry point for temporal filtering
///
/// Without a window every record passes through; timestamps that fail to
/// parse are left empty. With a window, records lacking a usable timestamp
/// are skipped and counted.
///
/// # Errors
/// * `ParseError::InvalidTimestamp` - Only under `ParsePolicy::Strict`,
///   for timestamp text that cannot be parsed. Missing timestamps never fail.
pub fn normalize(
    records: &[MetricRecord],
    window: Option<&RetentionWindow>,
    policy: ParsePolicy,
) -> Result<NormalizeOutcome, ParseError> {
    let mut outcome = NormalizeOutcome::default();

    for record in records {
        let timestamp = match record.timestamp.as_deref() {
            Some(raw) => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    if policy == ParsePolicy::Strict {
                        return Err(ParseError::InvalidTimestamp {
                            entity: record.entity.clone(),
                            value: raw.to_string(),
                        });
                    }
                    debug!("Unparseable timestamp '{}' for {}", raw, record.entity);
                    outcome.unparseable += 1;
                }
                parsed
            }
            None => None,
        };

        if let Some(window) = window {
            match timestamp {
                None => {
                    outcome.skipped += 1;
                    continue;
                }
                Some(at) if !window.contains(at) => {
                    outcome.outside_window += 1;
                    continue;
                }
                Some(_) => {}
            }
        }

        outcome.records.push(NormalizedRecord {
            entity: record.entity.clone(),
            timestamp,
            metrics: record.metrics.clone(),
        });
    }

    if outcome.skipped > 0 {
        warn!(
            "Skipped {} records without a usable timestamp",
            outcome.skipped
        );
    }

    debug!(
        "Normalized {} of {} records ({} outside window)",
        outcome.records.len(),
        records.len(),
        outcome.outside_window
    );

    Ok(outcome)
}
