//! Trend model implementation.
//!
//! The model is implemented as small, pure functions so that the fitting code
//! can stay generic.

pub mod model;

pub use model::*;
