//! Export the forecast report.
//!
//! The CSV is the sole required artifact and has a fixed layout:
//! `Product Name,Total Quantity Sold,Forecasted Quantity Sum`, forecast blank
//! when absent. The JSON export adds fit diagnostics and skip reasons.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{ForecastConfig, ForecastResult, ReportRow};
use crate::error::AppError;
use crate::fit::{ForecastBatch, SkippedProduct};
use crate::report::{REPORT_COLUMNS, format_quantity};

/// Write the report CSV to a file.
pub fn write_report_csv(path: &Path, rows: &[ReportRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::ingestion(format!("Failed to create report CSV '{}': {e}", path.display())))?;
    write_report_csv_to(file, rows)
}

/// Write the report CSV to any writer.
pub fn write_report_csv_to<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);

    writer
        .write_record(REPORT_COLUMNS)
        .map_err(|e| AppError::ingestion(format!("Failed to write report CSV header: {e}")))?;

    for r in rows {
        let forecast = r.forecast_sum.map(|v| v.to_string()).unwrap_or_default();
        writer
            .write_record([
                r.product_name.as_str(),
                format_quantity(r.total_quantity_sold).as_str(),
                forecast.as_str(),
            ])
            .map_err(|e| AppError::ingestion(format!("Failed to write report CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::ingestion(format!("Failed to flush report CSV: {e}")))?;
    Ok(())
}

/// JSON document written by `--json`.
#[derive(Debug, Serialize)]
pub struct ReportFile<'a> {
    pub tool: &'static str,
    pub selection: &'a str,
    pub horizon: usize,
    pub rows: &'a [ReportRow],
    pub skipped: &'a [SkippedProduct],
    pub forecasts: &'a [ForecastResult],
}

/// Write the report plus diagnostics as JSON.
pub fn write_report_json(
    path: &Path,
    rows: &[ReportRow],
    batch: &ForecastBatch,
    config: &ForecastConfig,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::ingestion(format!("Failed to create report JSON '{}': {e}", path.display())))?;

    let doc = ReportFile {
        tool: "demand",
        selection: &config.selection,
        horizon: config.horizon,
        rows,
        skipped: &batch.skipped,
        forecasts: &batch.forecasts,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::ingestion(format!("Failed to write report JSON: {e}")))?;

    Ok(())
}
