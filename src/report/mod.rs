//! Report assembly: left-outer merge of totals with forecast sums.

pub mod format;

use std::collections::BTreeMap;

use crate::domain::{ForecastResult, ProductTotal, ReportRow};
use crate::error::AppError;

pub use format::*;

/// Column headers of the emitted report, in order.
pub const REPORT_COLUMNS: [&str; 3] = ["Product Name", "Total Quantity Sold", "Forecasted Quantity Sum"];

/// Merge totals (driving side) with forecasts.
///
/// Every total yields exactly one row, in the order of `totals`. A forecast for
/// a product without a total, or two forecasts for one product, means an
/// upstream stage is broken and aborts the run.
pub fn assemble_report(totals: &[ProductTotal], forecasts: &[ForecastResult]) -> Result<Vec<ReportRow>, AppError> {
    let mut by_product: BTreeMap<&str, i64> = BTreeMap::new();
    for f in forecasts {
        if by_product.insert(f.product_name.as_str(), f.forecast_sum).is_some() {
            return Err(AppError::merge_invariant(format!(
                "Duplicate forecast for product '{}'.",
                f.product_name
            )));
        }
    }

    let mut rows = Vec::with_capacity(totals.len());
    for t in totals {
        rows.push(ReportRow {
            product_name: t.product_name.clone(),
            total_quantity_sold: t.total_quantity,
            forecast_sum: by_product.remove(t.product_name.as_str()),
        });
    }

    if let Some((orphan, _)) = by_product.into_iter().next() {
        return Err(AppError::merge_invariant(format!(
            "Forecast for product '{orphan}' has no matching total."
        )));
    }

    Ok(rows)
}

/// Render a quantity the way the report prints it: integral values without a
/// fractional part, everything else in shortest round-trip form.
pub fn format_quantity(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArimaParams;
    use crate::error::EXIT_INVARIANT;

    fn total(name: &str, q: f64) -> ProductTotal {
        ProductTotal {
            product_name: name.to_string(),
            total_quantity: q,
        }
    }

    fn forecast(name: &str, sum: i64) -> ForecastResult {
        ForecastResult {
            product_name: name.to_string(),
            forecast_sum: sum,
            values: vec![],
            params: ArimaParams {
                phi: 0.0,
                theta: 0.0,
                sigma2: 0.0,
                css: 0.0,
                n_obs: 0,
            },
        }
    }

    #[test]
    fn left_join_keeps_every_total() {
        let rows = assemble_report(
            &[total("Widget A", 69.0), total("Widget B", 5.0)],
            &[forecast("Widget A", 48)],
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].forecast_sum, Some(48));
        assert_eq!(rows[1].product_name, "Widget B");
        assert_eq!(rows[1].total_quantity_sold, 5.0);
        assert_eq!(rows[1].forecast_sum, None);
    }

    #[test]
    fn orphan_forecast_fails_loudly() {
        let err = assemble_report(&[total("A", 1.0)], &[forecast("Ghost", 3)]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INVARIANT);
        assert!(err.message().contains("Ghost"));
    }

    #[test]
    fn duplicate_forecast_fails_loudly() {
        let err = assemble_report(&[total("A", 1.0)], &[forecast("A", 3), forecast("A", 4)]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INVARIANT);
    }

    #[test]
    fn quantities_print_without_spurious_decimals() {
        assert_eq!(format_quantity(69.0), "69");
        assert_eq!(format_quantity(12.5), "12.5");
        assert_eq!(format_quantity(-3.0), "-3");
    }
}
