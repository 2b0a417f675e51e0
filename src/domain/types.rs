//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages by value
//! - exported to CSV/JSON
//! - asserted on directly in tests

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of future months forecast per product.
pub const DEFAULT_HORIZON: usize = 4;

/// Smallest monthly series the forecaster will attempt to fit.
///
/// ARIMA(1,1,1) estimated by conditional sum of squares needs at least two
/// conditional residuals, which means four raw observations.
pub const DEFAULT_MIN_OBSERVATIONS: usize = 4;

/// Output file name used when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "combined_df.csv";

/// How months without any sales are represented in a product's series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GapPolicy {
    /// Insert a zero-quantity point for every month between the first and last
    /// observed month (monthly resampling semantics).
    #[default]
    ZeroFill,
    /// Keep only months that had at least one transaction.
    Omit,
}

/// One cleaned sales transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub product_name: String,
    pub sale_date: NaiveDate,
    pub quantity: f64,
    /// Category tag from the `Type` column.
    pub kind: String,
    /// Remaining columns, passed through untouched (already trimmed).
    pub extra: BTreeMap<String, String>,
    /// 1-based line number in the source file.
    pub line: usize,
}

/// Summed demand for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Last calendar day of the month.
    pub period_end: NaiveDate,
    pub quantity: f64,
}

/// Monthly demand series for one product, ordered by `period_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSeries {
    pub product_name: String,
    pub points: Vec<MonthlyPoint>,
}

impl ProductSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.quantity).collect()
    }
}

/// Historical demand for one product over the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTotal {
    pub product_name: String,
    pub total_quantity: f64,
}

/// Fitted ARIMA(1,1,1) parameters for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArimaParams {
    pub phi: f64,
    pub theta: f64,
    /// Residual variance (CSS / number of conditional residuals).
    pub sigma2: f64,
    pub css: f64,
    pub n_obs: usize,
}

/// Successful forecast for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_name: String,
    /// Sum of the forecast values, rounded half-to-even.
    pub forecast_sum: i64,
    /// Raw forecast values, one per future month.
    pub values: Vec<f64>,
    pub params: ArimaParams,
}

/// One row of the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub product_name: String,
    pub total_quantity_sold: f64,
    pub forecast_sum: Option<i64>,
}

/// Fully-resolved configuration for a forecast run.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub input_path: PathBuf,
    /// Value of the `Type` column to keep.
    pub selection: String,
    pub output_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub horizon: usize,
    pub min_observations: usize,
    pub gap_policy: GapPolicy,
    /// Worker threads for per-product fitting (0 = rayon default).
    pub jobs: usize,
    pub print_summary: bool,
}

impl ForecastConfig {
    pub fn new(input_path: impl Into<PathBuf>, selection: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            selection: selection.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            json_path: None,
            horizon: DEFAULT_HORIZON,
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            gap_policy: GapPolicy::default(),
            jobs: 0,
            print_summary: true,
        }
    }
}

/// Settings for the synthetic transaction generator.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub output_path: PathBuf,
    pub products: usize,
    pub months: usize,
    pub seed: u64,
    pub kind: String,
    pub start: NaiveDate,
}
