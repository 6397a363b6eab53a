//! Per-request forecasting over the augmented series.
//!
//! Every call fits a fresh model; nothing is cached between requests. The
//! inputs are borrowed immutably, so concurrent calls need no locking.

use rayon::prelude::*;
use tracing::info;

use crate::domain::{AugmentedSeries, Forecast, ForecastOptions, ForecastPoint};
use crate::error::ForecastError;
use crate::fit::fitter::fit_trend;
use crate::io::ingest::normalize_source;

/// Longest horizon a single request may ask for, in years.
pub const MAX_HORIZON: usize = 100;

/// Forecast `opts.horizon` yearly periods after the last observed year of `source`.
///
/// `source` is normalized to title case before lookup.
pub fn forecast_source(
    series: &AugmentedSeries,
    source: &str,
    opts: &ForecastOptions,
) -> Result<Forecast, ForecastError> {
    if opts.horizon == 0 || opts.horizon > MAX_HORIZON {
        return Err(ForecastError::InvalidHorizon(opts.horizon));
    }

    let source = normalize_source(source);
    if !series.contains_source(&source) {
        return Err(ForecastError::UnknownSource(source));
    }
    let obs: Vec<(i32, f64)> = series.points_for(&source).map(|p| (p.year, p.potential)).collect();

    let fit = fit_trend(&source, &obs, opts)?;

    let mut points = Vec::with_capacity(opts.horizon);
    for step in 1..=opts.horizon {
        let year = i32::try_from(step)
            .ok()
            .and_then(|step| fit.last_year.checked_add(step))
            .ok_or(ForecastError::InvalidHorizon(opts.horizon))?;
        let yhat = fit.predict_year(year);
        if !yhat.is_finite() {
            return Err(ForecastError::Numerical {
                name: source,
                message: format!("non-finite prediction for {year}"),
            });
        }
        points.push(ForecastPoint { year, yhat });
    }

    info!(
        source = %source,
        observations = fit.n,
        rmse = fit.rmse,
        first_year = points[0].year,
        "forecast ready"
    );

    Ok(Forecast { source, points })
}

/// Forecast every available source, in sorted order.
///
/// Sources are fitted in parallel; the first failure fails the whole call.
pub fn forecast_all(series: &AugmentedSeries, opts: &ForecastOptions) -> Result<Vec<Forecast>, ForecastError> {
    series
        .sources()
        .par_iter()
        .map(|source| forecast_source(series, source, opts))
        .collect()
}
