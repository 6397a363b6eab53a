//! Export the augmented training series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::AugmentedSeries;
use crate::error::AppError;

/// Write the augmented series to a CSV file.
pub fn write_series_csv(path: &Path, series: &AugmentedSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series(file, series)
}

/// Write the augmented series as CSV to any writer.
pub fn write_series<W: Write>(out: W, series: &AugmentedSeries) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(["Sumber", "Tahun", "Potensi", "Offset"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in &series.points {
        writer
            .write_record([
                p.source.clone(),
                p.year.to_string(),
                format!("{:.6}", p.potential),
                p.offset.to_string(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
