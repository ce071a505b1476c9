//! CSV table writer.

use super::table::Table;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::path::Path;

/// Write a table to a CSV file, header first
///
/// **Public** - main entry point for CSV output
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent
///   cannot be created
/// * `OutputError::CsvFailed` - I/O or encoding error during write
pub fn write_table(table: &Table, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    debug!("Writing table to: {}", output_path.display());

    super::validate_path(output_path)?;
    super::ensure_parent(output_path)?;

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        "✓ Wrote {} rows to {}",
        table.rows.len(),
        output_path.display()
    );

    Ok(())
}
