//! Mathematical utilities: trend basis functions and (ridge) least squares.

pub mod basis;
pub mod ols;

pub use basis::*;
pub use ols::*;
