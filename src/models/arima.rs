//! ARIMA(1,1,1) without constant.
//!
//! With `w_t = y_t - y_{t-1}` the model is
//!
//! ```text
//! w_t = φ w_{t-1} + e_t + θ e_{t-1}
//! ```
//!
//! Estimation uses the conditional sum of squares (CSS): condition on `w_0`
//! and `e_0 = 0`, run the residual recursion forward and sum `e_t^2`.

use nalgebra::DVector;

use crate::math::{design_matrix, integrate, solve_least_squares};

/// Autoregressive, differencing and moving-average orders.
pub const ORDER: (usize, usize, usize) = (1, 1, 1);

/// Parameters are kept strictly inside the stationarity/invertibility region.
pub const PARAM_BOUND: f64 = 0.99;

/// Longest AR approximation used in the first Hannan–Rissanen stage.
const HR_MAX_LAGS: usize = 4;

/// Conditional residuals `e_1..e_{m-1}` for the differenced series `w`.
pub fn css_residuals(w: &[f64], phi: f64, theta: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(w.len().saturating_sub(1));
    let mut prev = 0.0;
    for t in 1..w.len() {
        let e = w[t] - phi * w[t - 1] - theta * prev;
        out.push(e);
        prev = e;
    }
    out
}

/// Conditional sum of squares.
///
/// Returns infinity as soon as the recursion overflows, so callers can compare
/// candidates without special-casing NaN.
pub fn css(w: &[f64], phi: f64, theta: f64) -> f64 {
    let mut sum = 0.0;
    let mut prev = 0.0;
    for t in 1..w.len() {
        let e = w[t] - phi * w[t - 1] - theta * prev;
        sum += e * e;
        if !sum.is_finite() {
            return f64::INFINITY;
        }
        prev = e;
    }
    sum
}

/// Forecast `steps` future differences.
///
/// The first step uses the last observed difference and residual; later steps
/// have zero expected shocks so only the AR term propagates.
pub fn forecast_differences(w: &[f64], last_residual: f64, phi: f64, theta: f64, steps: usize) -> Vec<f64> {
    let Some(&w_last) = w.last() else {
        return vec![0.0; steps];
    };

    let mut out = Vec::with_capacity(steps);
    let mut next = phi * w_last + theta * last_residual;
    for _ in 0..steps {
        out.push(next);
        next *= phi;
    }
    out
}

/// Forecast `steps` future levels of the undifferenced series `y`.
pub fn forecast_levels(y: &[f64], phi: f64, theta: f64, steps: usize) -> Vec<f64> {
    let Some(&y_last) = y.last() else {
        return Vec::new();
    };
    let w = crate::math::difference(y);
    let last_residual = css_residuals(&w, phi, theta).last().copied().unwrap_or(0.0);
    integrate(y_last, &forecast_differences(&w, last_residual, phi, theta, steps))
}

/// Hannan–Rissanen starting values `(φ, θ)` for the differenced series.
///
/// Stage 1 fits a long AR by least squares to estimate the innovations.
/// Stage 2 regresses `w_t` on `w_{t-1}` and the lagged innovation estimate.
/// Returns `None` when the series is too short for both regressions.
pub fn hannan_rissanen(w: &[f64]) -> Option<(f64, f64)> {
    let m = w.len();
    let k = HR_MAX_LAGS.min(m.saturating_sub(1) / 2);
    if k == 0 || m < k + 3 {
        return None;
    }

    // Stage 1: w_t ~ w_{t-1} .. w_{t-k}, t = k..m
    let lags: Vec<Vec<f64>> = (1..=k).map(|j| (k..m).map(|t| w[t - j]).collect()).collect();
    let lag_refs: Vec<&[f64]> = lags.iter().map(Vec::as_slice).collect();
    let x1 = design_matrix(&lag_refs)?;
    let y1 = DVector::from_row_slice(&w[k..]);
    let beta1 = solve_least_squares(&x1, &y1)?;
    let innovations: Vec<f64> = (&y1 - &x1 * &beta1).iter().copied().collect();

    // Stage 2: w_t ~ w_{t-1} + ê_{t-1}, t = k+1..m
    let w_lag: Vec<f64> = ((k + 1)..m).map(|t| w[t - 1]).collect();
    let e_lag: Vec<f64> = ((k + 1)..m).map(|t| innovations[t - 1 - k]).collect();
    let x2 = design_matrix(&[w_lag.as_slice(), e_lag.as_slice()])?;
    let y2 = DVector::from_row_slice(&w[(k + 1)..]);
    let beta2 = solve_least_squares(&x2, &y2)?;

    Some((clamp_param(beta2[0]), clamp_param(beta2[1])))
}

/// Clamp a coefficient into `[-PARAM_BOUND, PARAM_BOUND]`.
pub fn clamp_param(v: f64) -> f64 {
    if v.is_finite() { v.clamp(-PARAM_BOUND, PARAM_BOUND) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_residual_recursion() {
        let w = [1.0, 2.0, 0.5];
        let e = css_residuals(&w, 0.5, 0.25);
        // e1 = 2 - 0.5*1 - 0.25*0 = 1.5
        // e2 = 0.5 - 0.5*2 - 0.25*1.5 = -0.875
        assert_eq!(e.len(), 2);
        assert!((e[0] - 1.5).abs() < 1e-12);
        assert!((e[1] + 0.875).abs() < 1e-12);
        assert!((css(&w, 0.5, 0.25) - (1.5f64.powi(2) + 0.875f64.powi(2))).abs() < 1e-12);
    }

    #[test]
    fn forecast_levels_of_constant_series_stay_flat() {
        let y = [5.0; 6];
        let f = forecast_levels(&y, 0.4, -0.2, 4);
        assert_eq!(f, vec![5.0; 4]);
    }

    #[test]
    fn forecast_differences_decay_with_phi() {
        let f = forecast_differences(&[0.0, 2.0], 0.0, 0.5, 0.0, 3);
        assert_eq!(f, vec![1.0, 0.5, 0.25]);
    }

    #[test]
    fn hannan_rissanen_needs_enough_differences() {
        assert!(hannan_rissanen(&[1.0, 2.0, 3.0]).is_none());
        let w: Vec<f64> = (0..20).map(|i| ((i * 7) % 5) as f64 - 2.0).collect();
        let (phi, theta) = hannan_rissanen(&w).unwrap();
        assert!(phi.abs() <= PARAM_BOUND && theta.abs() <= PARAM_BOUND);
    }
}
