//! Inclusive-exclusive retention windows.

use crate::utils::error::ConfigError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Time range records must fall within: `start <= t < end`
///
/// Without an end the window is open to the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionWindow {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl RetentionWindow {
    /// # Errors
    /// * `ConfigError::InvalidWindow` - `end` is not after `start`
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<Self, ConfigError> {
        if let Some(end) = end {
            if end <= start {
                return Err(ConfigError::InvalidWindow(format!(
                    "end {} is not after start {}",
                    end.to_rfc3339(),
                    start.to_rfc3339()
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// The `days` days ending (exclusively) at `end`
    pub fn trailing_days(end: DateTime<Utc>, days: u32) -> Result<Self, ConfigError> {
        if days == 0 {
            return Err(ConfigError::InvalidWindow(
                "lookback_days must be greater than 0".to_string(),
            ));
        }
        let start = Duration::try_days(i64::from(days))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                ConfigError::InvalidWindow("lookback_days out of range".to_string())
            })?;
        Self::new(start, Some(end))
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && self.end.map_or(true, |end| at < end)
    }

    /// Human-readable range for logs and summaries
    pub fn describe(&self) -> String {
        match self.end {
            Some(end) => format!("[{}, {})", self.start.to_rfc3339(), end.to_rfc3339()),
            None => format!("[{}, ...)", self.start.to_rfc3339()),
        }
    }
}
