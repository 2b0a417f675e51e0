//! `demand-forecast` library crate.
//!
//! The binary (`demand`) is a thin wrapper around this library so that:
//!
//! - the forecasting pipeline is testable without spawning processes
//! - ingest, series building, fitting and reporting stay separate modules
//! - other front-ends (services, notebooks) can reuse the same pipeline

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod report;
pub mod series;
