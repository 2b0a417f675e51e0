//! Command-line parsing for the demand forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{DEFAULT_HORIZON, DEFAULT_MIN_OBSERVATIONS, DEFAULT_OUTPUT, GapPolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "demand", version, about = "Per-product ARIMA(1,1,1) demand forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read a sales CSV, forecast demand per product and write the report CSV.
    Forecast(ForecastArgs),
    /// Write a synthetic sales CSV in the input layout.
    Sample(SampleArgs),
}

/// Options for `demand forecast`.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Sales CSV with `Product Name`, `Date of Sale`, `Quantity` and `Type` columns.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Value of the `Type` column to forecast (exact, case-sensitive).
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub kind: String,

    /// Report CSV to write.
    #[arg(short, long, value_name = "CSV", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Also write the report with fit diagnostics as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,

    /// Months to forecast beyond the last observed month.
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: usize,

    /// Minimum monthly observations before a product is fitted.
    #[arg(long, default_value_t = DEFAULT_MIN_OBSERVATIONS)]
    pub min_observations: usize,

    /// How months without sales enter the series.
    #[arg(long, value_enum, default_value_t = GapPolicy::ZeroFill)]
    pub gaps: GapPolicy,

    /// Worker threads for per-product fitting (0 = one per core).
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Do not print the run summary.
    #[arg(short, long)]
    pub quiet: bool,

    /// Log fit diagnostics.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options for `demand sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// CSV file to write.
    #[arg(short, long, value_name = "CSV")]
    pub output: PathBuf,

    /// Number of products.
    #[arg(long, default_value_t = 5)]
    pub products: usize,

    /// Number of months per product.
    #[arg(long, default_value_t = 12)]
    pub months: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// `Type` value for the main transactions.
    #[arg(short = 't', long = "type", default_value = "EW")]
    pub kind: String,

    /// First month of the sample (YYYY-MM-DD).
    #[arg(long, default_value = "2023-01-01")]
    pub start: NaiveDate,

    /// Log progress details.
    #[arg(short, long)]
    pub verbose: bool,
}
