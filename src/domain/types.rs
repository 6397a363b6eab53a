//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during augmentation and fitting
//! - serialized straight into HTTP responses
//! - exported to CSV

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One historical observation after loader normalization.
///
/// `source` is always in canonical title case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub source: String,
    pub year: i32,
    pub potential: f64,
}

/// Growth regime used by the augmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    /// Solar and wind.
    Fast,
    /// Bioenergy and micro-hydro.
    Moderate,
    /// Everything else; may drift either way.
    Flat,
}

impl SourceCategory {
    pub fn of(source: &str) -> Self {
        match source {
            "Surya" | "Angin" => SourceCategory::Fast,
            "Bioenergi" | "Mikrohidro" => SourceCategory::Moderate,
            _ => SourceCategory::Flat,
        }
    }

    /// Per-year growth range `(low, high)` in MW.
    pub fn growth_range(self) -> (f64, f64) {
        match self {
            SourceCategory::Fast => (1.5, 3.0),
            SourceCategory::Moderate => (0.8, 1.5),
            SourceCategory::Flat => (-1.0, 1.0),
        }
    }
}

/// A synthetic yearly point derived from one historical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub source: String,
    pub year: i32,
    pub potential: f64,
    /// Offset from the originating record's year (`0..=5`).
    pub offset: u8,
}

/// The training series for every source, in generation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentedSeries {
    pub points: Vec<SeriesPoint>,
}

impl AugmentedSeries {
    /// Distinct source names, sorted.
    pub fn sources(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.source.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn contains_source(&self, source: &str) -> bool {
        self.points.iter().any(|p| p.source == source)
    }

    pub fn points_for<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a SeriesPoint> + 'a {
        self.points.iter().filter(move |p| p.source == source)
    }

    /// Mean potential per year for one source, ordered by year.
    pub fn yearly_means(&self, source: &str) -> Vec<YearValue> {
        let mut acc: std::collections::BTreeMap<i32, (f64, usize)> = std::collections::BTreeMap::new();
        for p in self.points_for(source) {
            let entry = acc.entry(p.year).or_insert((0.0, 0));
            entry.0 += p.potential;
            entry.1 += 1;
        }
        acc.into_iter()
            .map(|(year, (sum, n))| YearValue {
                year,
                potential: sum / n as f64,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A historical value in the combined series response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    #[serde(rename = "Tahun")]
    pub year: i32,
    #[serde(rename = "Potensi")]
    pub potential: f64,
}

/// One predicted period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(rename = "Tahun")]
    pub year: i32,
    pub yhat: f64,
}

/// Point forecasts for a single source, ordered by increasing year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(rename = "sumber")]
    pub source: String,
    #[serde(rename = "prediksi")]
    pub points: Vec<ForecastPoint>,
}

/// Coarse direction of a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Increasing,
    Decreasing,
    Stagnant,
}

impl TrendLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendLabel::Increasing => "increasing",
            TrendLabel::Decreasing => "decreasing",
            TrendLabel::Stagnant => "stagnant",
        }
    }
}

impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary derived from a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub source: String,
    pub trend: TrendLabel,
    /// Mean of successive differences of the predicted values.
    pub mean_delta: f64,
    pub final_year: i32,
    pub final_value: f64,
}

/// Tunables of the forecast engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastOptions {
    /// Number of yearly periods to predict after the last observed year.
    pub horizon: usize,
    /// Fraction of history (by time) eligible for changepoints.
    pub changepoint_range: f64,
    pub max_changepoints: usize,
    /// Scale of the Gaussian prior on slope changes (scaled units).
    pub changepoint_prior_scale: f64,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            horizon: 6,
            changepoint_range: 0.8,
            max_changepoints: 25,
            changepoint_prior_scale: 0.05,
        }
    }
}
