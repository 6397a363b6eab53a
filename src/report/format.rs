//! Formatted terminal output.
//!
//! Formatting lives in one place so the fitting code stays clean and output
//! changes are localized.

use crate::data::Dataset;
use crate::domain::{Forecast, Insight};

/// Header + year/value table for one forecast.
pub fn format_forecast(forecast: &Forecast) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Forecast: {} ===\n", forecast.source));
    out.push_str(&format_forecast_table(forecast));
    out
}

/// Year/value table (values with 2 decimals).
pub fn format_forecast_table(forecast: &Forecast) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<6} {:>14}\n", "Tahun", "Potensi (MW)"));
    out.push_str(&format!("{:-<6} {:-<14}\n", "", ""));
    for p in &forecast.points {
        out.push_str(&format!("{:<6} {:>14.2}\n", p.year, p.yhat));
    }
    out
}

/// Insight block: both summary lines.
pub fn format_insight(insight: &Insight) -> String {
    let [first, second] = insight.summary_lines();
    format!("{first}\n{second}\n")
}

/// Dataset overview: sources with record counts.
pub fn format_sources(dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Records: {} | augmented points: {} | seed: {}\n",
        dataset.historical.len(),
        dataset.augmented.len(),
        dataset.seed
    ));
    for source in dataset.sources() {
        let n = dataset.historical.iter().filter(|r| r.source == source).count();
        out.push_str(&format!("- {source} ({n} record{})\n", if n == 1 { "" } else { "s" }));
    }
    if !dataset.row_errors.is_empty() {
        out.push_str(&format!("({} row(s) skipped while loading)\n", dataset.row_errors.len()));
    }
    out
}
