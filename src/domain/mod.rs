//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - cleaned input records (`TransactionRecord`)
//! - derived series and totals (`ProductSeries`, `ProductTotal`)
//! - fit outputs and report rows (`ForecastResult`, `ReportRow`)
//! - run configuration (`ForecastConfig`, `GapPolicy`)

pub mod types;

pub use types::*;
