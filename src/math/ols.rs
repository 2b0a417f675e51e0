//! Ordinary least squares solver.
//!
//! The forecaster solves tiny regressions (one to three columns) to get
//! Hannan–Rissanen starting values for the ARMA part of the model:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! We use SVD so tall and slightly rank-deficient design matrices still solve.
//! (Nalgebra's `QR::solve` is intended for square systems and will panic for
//! non-square matrices.)

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Build a design matrix from column vectors of equal length.
pub fn design_matrix(columns: &[&[f64]]) -> Option<DMatrix<f64>> {
    let ncols = columns.len();
    let nrows = columns.first()?.len();
    if ncols == 0 || columns.iter().any(|c| c.len() != nrows) {
        return None;
    }
    Some(DMatrix::from_fn(nrows, ncols, |i, j| columns[j][i]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn design_matrix_is_column_major_from_slices() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let x = design_matrix(&[a.as_slice(), b.as_slice()]).unwrap();
        assert_eq!(x.nrows(), 3);
        assert_eq!(x[(1, 0)], 2.0);
        assert_eq!(x[(2, 1)], 6.0);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let a2 = [1.0, 2.0];
        assert!(solve_least_squares(&x, &y).is_none());
        let short = [1.0];
        assert!(design_matrix(&[a2.as_slice(), short.as_slice()]).is_none());
    }
}
