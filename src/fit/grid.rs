//! Parameter grids for the (φ, θ) search.
//!
//! We estimate ARIMA(1,1,1) with a deterministic grid search followed by
//! local refinement around the best point.
//!
//! Why grid search?
//! - The CSS surface of short series is often multimodal; a gradient method
//!   started from one point can stall in the wrong basin.
//! - It is deterministic given the same inputs.
//! - With two parameters a fine grid is cheap.

use crate::fit::FitError;

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, FitError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(FitError::InvalidGrid(format!(
            "range min={min}, max={max} must be finite with max>min"
        )));
    }
    if steps < 2 {
        return Err(FitError::InvalidGrid("steps must be >= 2".to_string()));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| min + step * i as f64).collect())
}

/// Full square grid over `[-bound, bound]^2`, φ-major.
pub fn param_grid(bound: f64, steps: usize) -> Result<Vec<(f64, f64)>, FitError> {
    let values = lin_space(-bound, bound, steps)?;
    Ok(square(&values, &values))
}

/// Square grid of half-width `half_width` centred on `center`, clamped to the bound.
///
/// Clamping can repeat points at the boundary; that is harmless for the search.
pub fn refine_grid(
    center: (f64, f64),
    half_width: f64,
    steps: usize,
    bound: f64,
) -> Result<Vec<(f64, f64)>, FitError> {
    let offsets = lin_space(-half_width, half_width, steps)?;
    let phis: Vec<f64> = offsets.iter().map(|d| (center.0 + d).clamp(-bound, bound)).collect();
    let thetas: Vec<f64> = offsets.iter().map(|d| (center.1 + d).clamp(-bound, bound)).collect();
    Ok(square(&phis, &thetas))
}

fn square(phis: &[f64], thetas: &[f64]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(phis.len() * thetas.len());
    for &phi in phis {
        for &theta in thetas {
            out.push((phi, theta));
        }
    }
    out
}
