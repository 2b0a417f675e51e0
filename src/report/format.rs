//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline and fitting code stay free of presentation concerns
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::domain::{ForecastConfig, ReportRow};
use crate::fit::SkippedProduct;
use crate::report::{REPORT_COLUMNS, format_quantity};

const NAME_WIDTH: usize = 32;

/// Format the run summary: counts, skipped products, report table.
pub fn format_run_summary(run: &RunOutput, config: &ForecastConfig) -> String {
    let mut out = String::new();

    out.push_str("=== demand - ARIMA(1,1,1) demand forecast ===\n");
    out.push_str(&format!("Input: {}\n", config.input_path.display()));
    out.push_str(&format!("Type: {}\n", config.selection));
    out.push_str(&format!(
        "Records: read={} | selected={} | products={}\n",
        run.records_read,
        run.series.records_selected,
        run.series.totals.len(),
    ));
    out.push_str(&format!(
        "Forecasts: horizon={} months | fitted={} | skipped={}\n",
        config.horizon,
        run.batch.forecasts.len(),
        run.batch.skipped.len(),
    ));

    if !run.batch.skipped.is_empty() {
        out.push_str("\nSkipped:\n");
        out.push_str(&format_skipped(&run.batch.skipped));
    }

    out.push('\n');
    out.push_str(&format_report_table(&run.report));
    out
}

fn format_skipped(skipped: &[SkippedProduct]) -> String {
    let mut out = String::new();
    for s in skipped {
        out.push_str(&format!("- {}: {}\n", truncate(&s.product_name, NAME_WIDTH), s.reason));
    }
    out
}

/// Fixed-width table of report rows.
pub fn format_report_table(rows: &[ReportRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<w$} {:>20} {:>24}",
            REPORT_COLUMNS[0],
            REPORT_COLUMNS[1],
            REPORT_COLUMNS[2],
            w = NAME_WIDTH
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!("{:-<w$} {:-<20} {:-<24}\n", "", "", "", w = NAME_WIDTH));

    for r in rows {
        let forecast = r.forecast_sum.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        out.push_str(
            format!(
                "{:<w$} {:>20} {:>24}",
                truncate(&r.product_name, NAME_WIDTH),
                format_quantity(r.total_quantity_sold),
                forecast,
                w = NAME_WIDTH
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
