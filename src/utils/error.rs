//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading raw tables
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read table {name}: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table {name}: {reason}")]
    Malformed { name: String, reason: String },

    #[error("No CSV tables found at {0}")]
    NoTables(String),
}

/// Errors that can occur during strict timestamp parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unparseable timestamp '{value}' for entity {entity}")]
    InvalidTimestamp { entity: String, value: String },
}

/// Errors raised by bad rollup parameters
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidRankError {
    #[error("top_n must be greater than 0")]
    ZeroCount,

    #[error("top_n {requested} is too large (max {max})")]
    CountTooLarge { requested: usize, max: usize },

    #[error("Ranking metric '{0}' is not among the tracked metrics")]
    UnknownMetric(String),
}

/// Errors that can occur while loading or resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Invalid retention window: {0}")]
    InvalidWindow(String),
}

/// Errors that abort a single pipeline invocation
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No metrics to track")]
    NoMetrics,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    InvalidRank(#[from] InvalidRankError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
