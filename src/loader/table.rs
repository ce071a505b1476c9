//! CSV table reading.
//!
//! Platform exports arrive as one CSV file per game. The entity label is
//! derived from the file name: the stem up to the first whitespace, so
//! `"SoRare_youtube_stats (2).csv"` belongs to `SoRare_youtube_stats`.

use super::schema::RawTable;
use crate::utils::error::LoadError;
use log::debug;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Derive the entity label for a table from its path
pub fn entity_label_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy())
        .and_then(|stem| stem.split_whitespace().next().map(str::to_string))
        .unwrap_or_default()
}

/// Read one CSV file into a raw table
///
/// **Public** - main entry point for single-table loading
///
/// # Errors
/// * `LoadError::Unreadable` - File cannot be opened or read
/// * `LoadError::Malformed` - Content is not a rectangular CSV table
pub fn read_table(path: impl AsRef<Path>) -> Result<RawTable, LoadError> {
    let path = path.as_ref();
    let name = path.display().to_string();

    debug!("Reading table: {}", name);

    let file = File::open(path).map_err(|source| LoadError::Unreadable {
        name: name.clone(),
        source,
    })?;

    parse_table(&name, &entity_label_from_path(path), file)
}

/// Parse CSV content from any reader into a raw table
///
/// Rows with a different number of cells than the header make the whole
/// table malformed.
pub fn parse_table<R: Read>(name: &str, label: &str, reader: R) -> Result<RawTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| csv_failure(name, e))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Malformed {
            name: name.to_string(),
            reason: "missing header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| csv_failure(name, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!("Table {}: {} columns, {} rows", name, headers.len(), rows.len());

    Ok(RawTable {
        name: name.to_string(),
        label: label.to_string(),
        headers,
        rows,
    })
}

/// Expand a source path into the CSV files it names
///
/// A file is returned as-is; a directory yields its `*.csv` entries sorted
/// by path.
pub fn discover_tables(path: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoadError> {
    let path = path.as_ref();
    let name = path.display().to_string();

    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|source| LoadError::Unreadable {
        name: name.clone(),
        source,
    })?;

    let mut tables: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_csv(p))
        .collect();
    tables.sort();

    if tables.is_empty() {
        return Err(LoadError::NoTables(name));
    }

    Ok(tables)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn csv_failure(name: &str, err: csv::Error) -> LoadError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Unreadable {
            name: name.to_string(),
            source,
        },
        _ => LoadError::Malformed {
            name: name.to_string(),
            reason,
        },
    }
}
