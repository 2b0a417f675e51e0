//! CSS estimation of ARIMA(1,1,1) for a single series.
//!
//! Given the monthly levels `y`, we:
//! - difference once
//! - seed the search with Hannan–Rissanen estimates
//! - grid-search (φ, θ) over the admissible square, then refine locally
//!
//! and return the candidate with the lowest conditional sum of squares.

use serde::Serialize;
use thiserror::Error;

use crate::domain::ArimaParams;
use crate::fit::grid::{param_grid, refine_grid};
use crate::math::difference;
use crate::models::{PARAM_BOUND, css, forecast_levels, hannan_rissanen};

/// Fewest levels the estimator accepts: two conditional residuals after differencing.
pub const MIN_LEVELS: usize = 4;

const GRID_STEPS: usize = 100;
const REFINE_STEPS: usize = 21;
const REFINE_ROUNDS: usize = 3;

/// Why a model could not be fitted or used to forecast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    #[error("series too short for ARIMA(1,1,1): {actual} observations, need {required}")]
    TooShort { required: usize, actual: usize },
    #[error("series contains non-finite values")]
    NonFiniteInput,
    #[error("invalid parameter grid: {0}")]
    InvalidGrid(String),
    #[error("no finite CSS candidate (degenerate series)")]
    NoCandidate,
    #[error("forecast is not finite")]
    NonFiniteForecast,
}

/// Benign numerical conditions recorded on a fit instead of being raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitWarning {
    /// φ sits on the stationarity bound.
    PhiOnBoundary,
    /// θ sits on the invertibility bound.
    ThetaOnBoundary,
    /// The model reproduces the series exactly.
    ZeroVariance,
}

impl std::fmt::Display for FitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FitWarning::PhiOnBoundary => "AR coefficient on stationarity boundary",
            FitWarning::ThetaOnBoundary => "MA coefficient on invertibility boundary",
            FitWarning::ZeroVariance => "zero residual variance",
        };
        f.write_str(s)
    }
}

/// A fitted model, ready to forecast.
#[derive(Debug, Clone)]
pub struct ArimaFit {
    pub params: ArimaParams,
    pub warnings: Vec<FitWarning>,
    levels: Vec<f64>,
}

impl ArimaFit {
    /// Forecast the next `steps` levels.
    pub fn forecast(&self, steps: usize) -> Result<Vec<f64>, FitError> {
        let values = forecast_levels(&self.levels, self.params.phi, self.params.theta, steps);
        if values.iter().all(|v| v.is_finite()) {
            Ok(values)
        } else {
            Err(FitError::NonFiniteForecast)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    idx: usize,
    phi: f64,
    theta: f64,
    css: f64,
}

/// Fit ARIMA(1,1,1) to evenly spaced levels.
pub fn fit_arima(y: &[f64]) -> Result<ArimaFit, FitError> {
    if y.len() < MIN_LEVELS {
        return Err(FitError::TooShort {
            required: MIN_LEVELS,
            actual: y.len(),
        });
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFiniteInput);
    }

    let w = difference(y);

    // Start values go first so they win ties against grid points.
    let mut grid = Vec::with_capacity(GRID_STEPS * GRID_STEPS + 1);
    if let Some(start) = hannan_rissanen(&w) {
        grid.push(start);
    }
    grid.extend(param_grid(PARAM_BOUND, GRID_STEPS)?);

    let mut best = best_candidate(&w, &grid).ok_or(FitError::NoCandidate)?;

    let mut half_width = 2.0 * PARAM_BOUND / (GRID_STEPS as f64 - 1.0);
    for _ in 0..REFINE_ROUNDS {
        let mut local = vec![(best.phi, best.theta)];
        local.extend(refine_grid((best.phi, best.theta), half_width, REFINE_STEPS, PARAM_BOUND)?);
        best = best_candidate(&w, &local).ok_or(FitError::NoCandidate)?;
        half_width /= 10.0;
    }

    let n_resid = w.len() - 1;
    let sigma2 = best.css / n_resid as f64;

    let mut warnings = Vec::new();
    if best.phi.abs() >= PARAM_BOUND {
        warnings.push(FitWarning::PhiOnBoundary);
    }
    if best.theta.abs() >= PARAM_BOUND {
        warnings.push(FitWarning::ThetaOnBoundary);
    }
    if sigma2 == 0.0 {
        warnings.push(FitWarning::ZeroVariance);
    }

    Ok(ArimaFit {
        params: ArimaParams {
            phi: best.phi,
            theta: best.theta,
            sigma2,
            css: best.css,
            n_obs: y.len(),
        },
        warnings,
        levels: y.to_vec(),
    })
}

/// Deterministic selection: minimum CSS, ties broken by candidate index.
fn best_candidate(w: &[f64], grid: &[(f64, f64)]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (idx, &(phi, theta)) in grid.iter().enumerate() {
        let value = css(w, phi, theta);
        if !value.is_finite() {
            continue;
        }
        let c = Candidate { idx, phi, theta, css: value };
        best = match best {
            Some(b) if b.css < c.css || (b.css == c.css && b.idx < c.idx) => Some(b),
            _ => Some(c),
        };
    }
    best
}
