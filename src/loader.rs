use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{info, warn};

use crate::error::ShotDataError;
use crate::normalize::normalize;
use crate::shots::{RawTable, RawValue, ShotTable};
use crate::validate::validate_ranges;

// Cell texts a CSV writer emits for missing values.
const NULL_LITERALS: [&str; 5] = ["nan", "NaN", "NA", "null", "NULL"];

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub check_ranges: bool,
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            check_ranges: true,
            strict: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedShots {
    pub table: ShotTable,
    pub warnings: Vec<String>,
}

pub fn load_shots_csv(path: &Path, opts: LoadOptions) -> Result<LoadedShots, ShotDataError> {
    let raw = read_raw_csv(path)?;
    let table = normalize(&raw)?;
    let warnings = if opts.check_ranges {
        validate_ranges(&table, opts.strict)?
    } else {
        Vec::new()
    };
    for w in &warnings {
        warn!(path = %path.display(), "{w}");
    }
    info!(path = %path.display(), shots = table.len(), "loaded shot data");
    Ok(LoadedShots { table, warnings })
}

/// Reads a CSV file into untyped cells without applying the schema.
pub fn read_raw_csv(path: &Path) -> Result<RawTable, ShotDataError> {
    if !path.exists() {
        return Err(ShotDataError::FileNotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !ext.eq_ignore_ascii_case("csv") {
        let shown = if ext.is_empty() {
            String::new()
        } else {
            format!(".{ext}")
        };
        return Err(ShotDataError::UnsupportedExtension(shown));
    }

    let raw = fs::read(path)?;
    let table = parse_csv(&raw)?;
    if table.is_empty() {
        return Err(ShotDataError::Empty);
    }
    Ok(table)
}

pub fn parse_csv(bytes: &[u8]) -> Result<RawTable, ShotDataError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);
    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(csv_cell).collect());
    }
    Ok(RawTable::new(headers, rows))
}

fn csv_cell(field: &str) -> RawValue {
    let trimmed = field.trim();
    if trimmed.is_empty() || NULL_LITERALS.contains(&trimmed) {
        RawValue::Null
    } else {
        RawValue::text(field)
    }
}

/// Writes a table with its full column set.
pub fn write_shots_csv(table: &ShotTable, path: &Path) -> Result<(), ShotDataError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(table.columns())?;
    for shot in table {
        writer.write_record(table.columns().iter().map(|c| table.cell_text(shot, c)))?;
    }
    writer.flush()?;
    info!(path = %path.display(), shots = table.len(), "wrote shot data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{csv_cell, parse_csv};
    use crate::shots::RawValue;

    #[test]
    fn blank_and_nan_cells_are_missing() {
        assert_eq!(csv_cell(""), RawValue::Null);
        assert_eq!(csv_cell("  "), RawValue::Null);
        assert_eq!(csv_cell("NaN"), RawValue::Null);
        assert_eq!(csv_cell("SAC"), RawValue::text("SAC"));
    }

    #[test]
    fn ragged_rows_fail_to_parse() {
        let raw = b"a,b\n1,2\n3\n";
        assert!(parse_csv(raw).is_err());
    }
}
