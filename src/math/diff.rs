//! Differencing and integration of evenly spaced series.

/// First differences: `w_t = y_{t+1} - y_t`.
pub fn difference(y: &[f64]) -> Vec<f64> {
    y.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Undo one order of differencing, starting from the last observed level.
pub fn integrate(last_level: f64, increments: &[f64]) -> Vec<f64> {
    let mut level = last_level;
    increments
        .iter()
        .map(|dw| {
            level += dw;
            level
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_then_integrate_restores_levels() {
        let y = [10.0, 12.0, 11.0, 13.0];
        let w = difference(&y);
        assert_eq!(w, vec![2.0, -1.0, 2.0]);
        assert_eq!(integrate(y[0], &w), vec![12.0, 11.0, 13.0]);
    }

    #[test]
    fn short_series_have_no_differences() {
        assert!(difference(&[5.0]).is_empty());
        assert!(difference(&[]).is_empty());
    }
}
