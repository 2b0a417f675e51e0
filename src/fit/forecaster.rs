//! Per-product forecasting.
//!
//! Every product is fitted independently. A product either yields a
//! `ForecastResult` or is skipped with a `SkipReason`; nothing a single
//! product does can abort the batch.

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{ForecastResult, ProductSeries};
use crate::error::AppError;
use crate::fit::estimator::{FitError, fit_arima};

/// Options shared by every product in a batch.
#[derive(Debug, Clone, Copy)]
pub struct ForecastOptions {
    pub horizon: usize,
    pub min_observations: usize,
    /// Worker threads (0 = rayon's global pool).
    pub jobs: usize,
}

/// Why a product received no forecast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("insufficient data: {actual} monthly observations, need at least {required}")]
    InsufficientData { required: usize, actual: usize },
    #[error("model fit failed: {0}")]
    ModelFit(#[from] FitError),
}

/// Result of forecasting one product.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    Forecast(ForecastResult),
    Skipped { product_name: String, reason: SkipReason },
}

/// A skipped product with its reason, as reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedProduct {
    pub product_name: String,
    pub reason: String,
}

/// All outcomes of a batch, each list ordered by product name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBatch {
    pub forecasts: Vec<ForecastResult>,
    pub skipped: Vec<SkippedProduct>,
}

/// Forecast a single product's monthly series.
pub fn forecast_product(series: &ProductSeries, horizon: usize, min_observations: usize) -> ForecastOutcome {
    let product_name = series.product_name.clone();

    if series.len() < min_observations.max(1) {
        return ForecastOutcome::Skipped {
            product_name,
            reason: SkipReason::InsufficientData {
                required: min_observations.max(1),
                actual: series.len(),
            },
        };
    }

    match fit_and_sum(series, horizon) {
        Ok(result) => ForecastOutcome::Forecast(result),
        Err(e) => ForecastOutcome::Skipped {
            product_name,
            reason: SkipReason::ModelFit(e),
        },
    }
}

fn fit_and_sum(series: &ProductSeries, horizon: usize) -> Result<ForecastResult, FitError> {
    let fit = fit_arima(&series.quantities())?;
    for warning in &fit.warnings {
        tracing::debug!(product = %series.product_name, %warning, "fit warning");
    }

    let values = fit.forecast(horizon)?;
    let forecast_sum = round_sum(values.iter().sum())?;

    tracing::debug!(
        product = %series.product_name,
        phi = fit.params.phi,
        theta = fit.params.theta,
        sigma2 = fit.params.sigma2,
        forecast_sum,
        "fitted ARIMA(1,1,1)"
    );

    Ok(ForecastResult {
        product_name: series.product_name.clone(),
        forecast_sum,
        values,
        params: fit.params,
    })
}

/// Round half-to-even into an integer quantity.
pub fn round_sum(sum: f64) -> Result<i64, FitError> {
    let rounded = sum.round_ties_even();
    if rounded.is_finite() && rounded.abs() < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(FitError::NonFiniteForecast)
    }
}

/// Forecast every product in parallel.
///
/// Only building a dedicated thread pool can fail; per-product failures end up
/// in `ForecastBatch::skipped`.
pub fn forecast_all(series: &[ProductSeries], opts: &ForecastOptions) -> Result<ForecastBatch, AppError> {
    let run = || -> Vec<ForecastOutcome> {
        series
            .par_iter()
            .map(|s| forecast_product(s, opts.horizon, opts.min_observations))
            .collect()
    };

    let outcomes = if opts.jobs > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.jobs)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build a {}-thread worker pool: {e}", opts.jobs)))?;
        pool.install(run)
    } else {
        run()
    };

    Ok(collect_outcomes(outcomes))
}

/// Split outcomes into forecasts and skips, ordered by product name.
pub fn collect_outcomes(outcomes: Vec<ForecastOutcome>) -> ForecastBatch {
    let mut batch = ForecastBatch::default();
    for outcome in outcomes {
        match outcome {
            ForecastOutcome::Forecast(result) => batch.forecasts.push(result),
            ForecastOutcome::Skipped { product_name, reason } => {
                tracing::warn!(product = %product_name, %reason, "skipping forecast");
                batch.skipped.push(SkippedProduct {
                    product_name,
                    reason: reason.to_string(),
                });
            }
        }
    }
    batch.forecasts.sort_by(|a, b| a.product_name.cmp(&b.product_name));
    batch.skipped.sort_by(|a, b| a.product_name.cmp(&b.product_name));
    batch
}
