//! CSV reading and writing for uploads and cleaned exports

use crate::config::CsvSettings;
use crate::error::{InsightsError, Result, ResultExt as _};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Parse an uploaded CSV held fully in memory
pub fn read_csv_bytes(bytes: &[u8], settings: &CsvSettings) -> Result<DataFrame> {
    let separator = u8::try_from(settings.separator).map_err(|e| {
        InsightsError::Config(format!("CSV separator {:?}: {e}", settings.separator))
    })?;

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(settings.infer_schema_length)
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| InsightsError::DataProcessing(format!("Failed to read CSV: {e}")))
}

/// Read a `.csv` file from disk; other extensions are rejected
pub fn read_csv_path(path: &Path, settings: &CsvSettings) -> Result<DataFrame> {
    ensure_csv_extension(path)?;

    let bytes = std::fs::read(path).map_err(|e| {
        InsightsError::InvalidPath(format!("Failed to read {}: {e}", path.display()))
    })?;

    read_csv_bytes(&bytes, settings)
}

pub fn ensure_csv_extension(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    if ext == "csv" {
        Ok(())
    } else {
        Err(InsightsError::InvalidPath(format!(
            "{} is not a CSV file",
            path.display()
        )))
    }
}

pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .map_err(|e| InsightsError::DataProcessing(format!("Failed to write CSV: {e}")))
}
