//! Piecewise-linear trend evaluation.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a scaled time and a set of changepoints (for OLS)
//! - predict `y(t)` given coefficients and changepoints
//!
//! Coefficient layout: `[m, k, δ_1, …, δ_n]` (intercept, base slope, one slope
//! change per changepoint), all in scaled units.

use crate::math::hinge;

/// Number of coefficients for `n_changepoints` changepoints.
pub fn coef_len(n_changepoints: usize) -> usize {
    2 + n_changepoints
}

/// Fill a design row for scaled time `t`.
///
/// # Panics
/// Panics if `out.len() != coef_len(changepoints.len())`.
pub fn fill_design_row(t: f64, changepoints: &[f64], out: &mut [f64]) {
    assert_eq!(out.len(), coef_len(changepoints.len()));
    out[0] = 1.0;
    out[1] = t;
    for (j, &s) in changepoints.iter().enumerate() {
        out[2 + j] = hinge(t, s);
    }
}

/// Predict the scaled trend value at scaled time `t`.
pub fn predict(t: f64, coefs: &[f64], changepoints: &[f64]) -> f64 {
    let mut y = coefs[0] + coefs[1] * t;
    for (j, &s) in changepoints.iter().enumerate() {
        y += coefs[2 + j] * hinge(t, s);
    }
    y
}
