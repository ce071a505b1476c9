//! Output writers for pipeline results.
//!
//! This module handles writing data to disk in various formats:
//! - JSON reports
//! - CSV tables (aggregate, shares, rollups, trend, record extracts)

pub mod csv_writer;
pub mod json;
pub mod table;

// Re-export main functions
pub use csv_writer::write_table;
pub use json::{read_report, write_report};
pub use table::{
    aggregate_table, format_value, records_table, rollup_table, share_column, share_table,
    trend_table, Table,
};

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create parent directories if needed
pub fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
