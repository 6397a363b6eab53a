//! Low-level fitting of the piecewise-linear trend for one series.
//!
//! Given yearly observations `(year_i, y_i)` (years may repeat) we:
//! - scale time to `[0, 1]` over the observed span and `y` by `max |y|`
//! - place changepoints over the distinct observed years
//! - estimate the noise variance `σ²` from a plain linear fit
//! - solve the ridge problem with penalty `λ = σ² / τ²` on the slope changes,
//!   which is the MAP estimate under a Gaussian prior of scale `τ`
//!
//! Seasonality is not modelled: the series is yearly.

use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::ForecastOptions;
use crate::error::ForecastError;
use crate::fit::changepoints::place_changepoints;
use crate::math::{TimeScale, solve_least_squares, solve_ridge};
use crate::models::{coef_len, fill_design_row, predict};

/// Floor on the estimated noise variance (scaled units).
const MIN_NOISE_VAR: f64 = 1e-8;

/// A fitted trend for one source.
#[derive(Debug, Clone)]
pub struct TrendFit {
    pub scale: TimeScale,
    pub y_scale: f64,
    /// Changepoints in scaled time.
    pub changepoints: Vec<f64>,
    /// `[m, k, δ_1, …]` in scaled units.
    pub coefs: Vec<f64>,
    /// Ridge penalty applied to the slope changes.
    pub lambda: f64,
    /// In-sample RMSE in original units.
    pub rmse: f64,
    pub n: usize,
    pub last_year: i32,
}

impl TrendFit {
    /// Predicted value (original units) for a calendar year.
    pub fn predict_year(&self, year: i32) -> f64 {
        let t = self.scale.scale(f64::from(year));
        predict(t, &self.coefs, &self.changepoints) * self.y_scale
    }
}

/// Fit the trend model to one source's observations.
pub fn fit_trend(source: &str, obs: &[(i32, f64)], opts: &ForecastOptions) -> Result<TrendFit, ForecastError> {
    let years: BTreeSet<i32> = obs.iter().map(|(y, _)| *y).collect();
    if years.len() < 2 {
        return Err(ForecastError::DegenerateSeries {
            name: source.to_string(),
            distinct_years: years.len(),
        });
    }
    if obs.iter().any(|(_, v)| !v.is_finite()) {
        return Err(numerical(source, "non-finite observation"));
    }

    let (Some(&first), Some(&last)) = (years.first(), years.last()) else {
        return Err(numerical(source, "empty year set"));
    };
    let scale = TimeScale::fit(f64::from(first), f64::from(last))
        .ok_or_else(|| numerical(source, "invalid time span"))?;

    let y_max = obs.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);
    let y_scale = if y_max > 0.0 { y_max } else { 1.0 };

    let n = obs.len();
    let t: Vec<f64> = obs.iter().map(|(y, _)| scale.scale(f64::from(*y))).collect();
    let y = DVector::from_iterator(n, obs.iter().map(|(_, v)| v / y_scale));

    let distinct_t: Vec<f64> = years.iter().map(|y| scale.scale(f64::from(*y))).collect();
    let changepoints = place_changepoints(&distinct_t, opts.changepoint_range, opts.max_changepoints);

    let noise_var = linear_noise_variance(&t, &y).ok_or_else(|| numerical(source, "linear fit failed"))?;
    let tau = opts.changepoint_prior_scale;
    let lambda = noise_var / (tau * tau);

    let p = coef_len(changepoints.len());
    let mut x = DMatrix::<f64>::zeros(n, p);
    let mut row = vec![0.0; p];
    for (i, &ti) in t.iter().enumerate() {
        fill_design_row(ti, &changepoints, &mut row);
        for (j, v) in row.iter().enumerate() {
            x[(i, j)] = *v;
        }
    }

    let mut penalties = vec![lambda; p];
    penalties[0] = 0.0;
    penalties[1] = 0.0;

    let beta = solve_ridge(&x, &y, &penalties).ok_or_else(|| numerical(source, "trend solve failed"))?;
    let coefs: Vec<f64> = beta.iter().copied().collect();

    let mut sse = 0.0;
    for (i, &ti) in t.iter().enumerate() {
        let r = (y[i] - predict(ti, &coefs, &changepoints)) * y_scale;
        sse += r * r;
    }
    let rmse = (sse / n as f64).sqrt();
    if !rmse.is_finite() {
        return Err(numerical(source, "non-finite residuals"));
    }

    debug!(
        source,
        n,
        changepoints = changepoints.len(),
        lambda,
        rmse,
        "fitted trend"
    );

    Ok(TrendFit {
        scale,
        y_scale,
        changepoints,
        coefs,
        lambda,
        rmse,
        n,
        last_year: last,
    })
}

/// Residual variance of `y ~ a + b t`, floored at `MIN_NOISE_VAR`.
fn linear_noise_variance(t: &[f64], y: &DVector<f64>) -> Option<f64> {
    let n = t.len();
    let x = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { t[i] });
    let beta = solve_least_squares(&x, y)?;
    let residuals = y - &x * &beta;
    let dof = n.saturating_sub(2).max(1) as f64;
    let var = residuals.norm_squared() / dof;
    var.is_finite().then_some(var.max(MIN_NOISE_VAR))
}

fn numerical(source: &str, message: &str) -> ForecastError {
    ForecastError::Numerical {
        name: source.to_string(),
        message: message.to_string(),
    }
}
