//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - loader output (`HistoricalRecord`)
//! - the synthetic training series (`SeriesPoint`, `AugmentedSeries`)
//! - forecast outputs (`Forecast`, `Insight`, `TrendLabel`)

pub mod types;

pub use types::*;
