//! Trend classification and natural-language summaries of a forecast.

use crate::domain::{Forecast, Insight, TrendLabel};
use crate::error::InsightError;

/// First year mentioned in every summary sentence.
pub const INSIGHT_START_YEAR: i32 = 2025;

/// Derive the trend label and terminal snapshot from a forecast.
///
/// The label comes from the mean of successive differences; an exact zero is
/// `Stagnant` (no tolerance band).
pub fn summarize(forecast: &Forecast) -> Result<Insight, InsightError> {
    let points = &forecast.points;
    if points.len() < 2 {
        return Err(InsightError::TooFewPoints(points.len()));
    }

    let deltas: Vec<f64> = points.windows(2).map(|w| w[1].yhat - w[0].yhat).collect();
    let mean_delta = deltas.iter().sum::<f64>() / deltas.len() as f64;

    let trend = if mean_delta > 0.0 {
        TrendLabel::Increasing
    } else if mean_delta < 0.0 {
        TrendLabel::Decreasing
    } else {
        TrendLabel::Stagnant
    };

    let last = points[points.len() - 1];
    Ok(Insight {
        source: forecast.source.clone(),
        trend,
        mean_delta,
        final_year: last.year,
        final_value: last.yhat,
    })
}

impl Insight {
    /// One-sentence summary.
    pub fn sentence(&self) -> String {
        format!(
            "The energy potential of {} is forecast to be {} from {} to {}, reaching {:.2} MW in {}.",
            self.source,
            self.trend,
            INSIGHT_START_YEAR,
            self.final_year,
            self.final_value,
            self.final_year,
        )
    }

    /// Two-line summary used by the PDF report.
    pub fn summary_lines(&self) -> [String; 2] {
        [
            self.sentence(),
            format!("Average change: {:+.2} MW per year.", self.mean_delta),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ForecastPoint;

    fn forecast(values: &[(i32, f64)]) -> Forecast {
        Forecast {
            source: "Surya".to_string(),
            points: values
                .iter()
                .map(|&(year, yhat)| ForecastPoint { year, yhat })
                .collect(),
        }
    }

    #[test]
    fn increasing_forecast() {
        let insight = summarize(&forecast(&[(2025, 10.0), (2026, 12.0), (2027, 14.0)])).unwrap();
        assert_eq!(insight.trend, TrendLabel::Increasing);
        assert!((insight.mean_delta - 2.0).abs() < 1e-12);
        assert_eq!(insight.final_year, 2027);
        assert_eq!(insight.final_value, 14.0);
    }

    #[test]
    fn constant_forecast_is_stagnant() {
        let insight = summarize(&forecast(&[(2025, 5.0), (2026, 5.0), (2027, 5.0)])).unwrap();
        assert_eq!(insight.trend, TrendLabel::Stagnant);
        assert_eq!(insight.mean_delta, 0.0);
    }

    #[test]
    fn decreasing_forecast() {
        let insight = summarize(&forecast(&[(2025, 9.0), (2026, 8.5), (2027, 8.7), (2028, 7.0)])).unwrap();
        assert_eq!(insight.trend, TrendLabel::Decreasing);
    }

    #[test]
    fn single_point_is_rejected() {
        let err = summarize(&forecast(&[(2025, 1.0)])).unwrap_err();
        assert_eq!(err, InsightError::TooFewPoints(1));
    }

    #[test]
    fn sentence_embeds_rounded_terminal_value() {
        let insight = summarize(&forecast(&[(2025, 10.0), (2030, 14.4567)])).unwrap();
        let s = insight.sentence();
        assert!(s.contains("Surya"));
        assert!(s.contains("increasing"));
        assert!(s.contains("from 2025 to 2030"));
        assert!(s.contains("14.46 MW"));
        let [_, second] = insight.summary_lines();
        assert_eq!(second, "Average change: +4.46 MW per year.");
    }
}
