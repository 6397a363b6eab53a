//! `potensi` library crate.
//!
//! Renewable-energy potential forecasts per source: a seeded augmenter turns
//! sparse history into a training series, a regularized piecewise-linear trend
//! is fitted per request, and results are served as JSON, text or PDF.
//!
//! The binary (`potensi`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the HTTP layer and the CLI share one pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod server;
