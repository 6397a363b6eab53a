//! CSV ingest and normalization.
//!
//! This module turns the historical potential CSV into a clean, deduplicated
//! list of `HistoricalRecord`s.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic order**: records keep file order, which the augmenter's
//!   random draws depend on

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::HistoricalRecord;
use crate::error::AppError;

const COL_SOURCE: &str = "sumber";
const COL_YEAR: &str = "tahun";
const COL_POTENTIAL: &str = "potensi";

/// Accepted `Tahun` values; augmentation extends each record five years forward.
pub const YEAR_RANGE: RangeInclusive<i32> = 1900..=2200;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized records + row diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<HistoricalRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Rows dropped because their `(source, year)` pair was already seen.
    pub duplicates: usize,
}

/// Load and normalize the historical dataset from a CSV file.
pub fn load_records(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_records(file)?;
    info!(
        path = %path.display(),
        rows = data.rows_read,
        records = data.records.len(),
        duplicates = data.duplicates,
        skipped = data.row_errors.len(),
        "loaded historical dataset"
    );
    Ok(data)
}

/// Parse records from any reader (used by `load_records` and tests).
pub fn read_records<R: Read>(input: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut seen: HashSet<(String, i32)> = HashSet::new();
    let mut rows_read = 0usize;
    let mut duplicates = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => {
                if seen.insert((row.source.clone(), row.year)) {
                    records.push(row);
                } else {
                    duplicates += 1;
                }
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for e in &row_errors {
        warn!(line = e.line, "skipped row: {}", e.message);
    }

    if records.is_empty() {
        return Err(AppError::new(3, "No valid rows remain after normalization."));
    }

    Ok(IngestedData {
        records,
        row_errors,
        rows_read,
        duplicates,
    })
}

/// Canonical source name: trimmed, title-cased.
///
/// The first cased character of every alphabetic run is upper-cased and the
/// rest lower-cased, so `"panas bumi"` becomes `"Panas Bumi"` and
/// `"mikro-hidro"` becomes `"Mikro-Hidro"`.
pub fn normalize_source(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_cased = false;
    for ch in name.trim().chars() {
        if ch.is_alphabetic() {
            if prev_cased {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(ch);
            prev_cased = false;
        }
    }
    out
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for col in [COL_SOURCE, COL_YEAR, COL_POTENTIAL] {
        if !header_map.contains_key(col) {
            return Err(AppError::new(
                2,
                format!("Missing required column: `{}`", display_column(col)),
            ));
        }
    }
    Ok(())
}

fn display_column(col: &str) -> &'static str {
    match col {
        COL_SOURCE => "Sumber",
        COL_YEAR => "Tahun",
        _ => "Potensi",
    }
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<HistoricalRecord, String> {
    let source = normalize_source(get_required(record, header_map, COL_SOURCE)?);
    if source.is_empty() {
        return Err("Empty `Sumber`".to_string());
    }

    let year_raw = get_required(record, header_map, COL_YEAR)?;
    let year = parse_year(year_raw).ok_or_else(|| format!("Invalid `Tahun`: '{year_raw}'"))?;
    if !YEAR_RANGE.contains(&year) {
        return Err(format!(
            "`Tahun` {year} outside {}..={}",
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        ));
    }

    let potential_raw = get_required(record, header_map, COL_POTENTIAL)?;
    let potential = potential_raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid `Potensi`: '{potential_raw}'"))?;

    Ok(HistoricalRecord {
        source,
        year,
        potential,
    })
}

fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(y) = raw.parse::<i32>() {
        return Some(y);
    }
    // Spreadsheets sometimes write integer columns as `2020.0`.
    let v = raw.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    col: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(col)
        .copied()
        .ok_or_else(|| format!("Missing column `{}`", display_column(col)))?;
    let value = record.get(idx).unwrap_or("").trim();
    if value.is_empty() {
        return Err(format!("Missing value for `{}`", display_column(col)));
    }
    Ok(value)
}
