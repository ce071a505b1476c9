//! Column presets for the supported source platforms.
//!
//! Each platform exports a different set of columns. Presets are plain
//! configuration: every platform runs through the same pipeline.

use super::schema::TableSchema;
use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Per-video exports
    Youtube,
    /// Per-tweet search exports
    Twitter,
    /// Daily tweet counts, one row per query and date
    TwitterCounts,
    /// Per-day stream statistics
    Twitch,
    /// Columns come entirely from configuration
    #[default]
    Custom,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Youtube,
        Platform::Twitter,
        Platform::TwitterCounts,
        Platform::Twitch,
        Platform::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Twitter => "twitter",
            Platform::TwitterCounts => "twitter-counts",
            Platform::Twitch => "twitch",
            Platform::Custom => "custom",
        }
    }

    /// Column layout of this platform's exports
    pub fn schema(&self) -> TableSchema {
        match self {
            Platform::Youtube => TableSchema {
                timestamp_column: Some("Published Date".to_string()),
                entity_column: None,
                metric_columns: Some(owned(&[
                    "View Count",
                    "Like Count",
                    "Comment Count",
                    "Subscriber Count",
                ])),
                count_metric: None,
            },
            Platform::Twitter => TableSchema {
                timestamp_column: Some("Time".to_string()),
                entity_column: None,
                metric_columns: Some(owned(&["Retweet Count", "Likes Count"])),
                count_metric: Some("Tweet Count".to_string()),
            },
            Platform::TwitterCounts => TableSchema {
                timestamp_column: Some("Date".to_string()),
                entity_column: Some("Query".to_string()),
                metric_columns: Some(owned(&["Tweet Count"])),
                count_metric: None,
            },
            Platform::Twitch => TableSchema {
                timestamp_column: Some("Date".to_string()),
                entity_column: None,
                metric_columns: Some(owned(&[
                    "Watch time (mins)",
                    "Stream time (mins)",
                    "Average viewers",
                    "Peak viewers",
                ])),
                count_metric: None,
            },
            Platform::Custom => TableSchema::default(),
        }
    }
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownPlatform(s.to_string()))
    }
}
