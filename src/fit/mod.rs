//! Trend fitting and forecasting.
//!
//! Responsibilities:
//!
//! - place changepoints over the observed years
//! - fit the regularized piecewise-linear trend for one series
//! - forecast a source (or all sources, in parallel) from the augmented series

pub mod changepoints;
pub mod engine;
pub mod fitter;

pub use changepoints::*;
pub use engine::*;
pub use fitter::*;
