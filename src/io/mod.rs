//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - augmented series export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
