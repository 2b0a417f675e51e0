//! Shared forecast pipeline used by the CLI and by tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! read CSV -> normalize -> build series -> forecast per product -> assemble report
//!
//! Front-ends only decide where the input comes from and what to do with the output.

use crate::domain::{ForecastConfig, ReportRow, TransactionRecord};
use crate::error::AppError;
use crate::fit::{ForecastBatch, ForecastOptions, forecast_all};
use crate::io::ingest::{RawTable, normalize_records, read_table_from_path};
use crate::report::assemble_report;
use crate::series::{SeriesSet, build_series};

/// All computed outputs of a single `demand forecast` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub records_read: usize,
    pub series: SeriesSet,
    pub batch: ForecastBatch,
    pub report: Vec<ReportRow>,
}

/// Check option values before touching any input.
pub fn validate_config(config: &ForecastConfig) -> Result<(), AppError> {
    if config.horizon == 0 {
        return Err(AppError::ingestion("`--horizon` must be >= 1."));
    }
    if config.min_observations == 0 {
        return Err(AppError::ingestion("`--min-observations` must be >= 1."));
    }
    Ok(())
}

/// Execute the full pipeline, reading the input file named in `config`.
pub fn run_forecast(config: &ForecastConfig) -> Result<RunOutput, AppError> {
    validate_config(config)?;

    // 1) Read the raw table.
    let table = read_table_from_path(&config.input_path)?;
    tracing::info!(
        path = %config.input_path.display(),
        rows = table.rows.len(),
        "read input CSV"
    );

    run_forecast_with_table(config, &table)
}

/// Execute the pipeline on an already-read table.
pub fn run_forecast_with_table(config: &ForecastConfig, table: &RawTable) -> Result<RunOutput, AppError> {
    validate_config(config)?;

    // 2) Normalize into typed records.
    let records = normalize_records(table)?;

    run_forecast_with_records(config, &records)
}

/// Execute the pipeline on normalized records.
pub fn run_forecast_with_records(
    config: &ForecastConfig,
    records: &[TransactionRecord],
) -> Result<RunOutput, AppError> {
    // 3) Filter by type, bucket monthly, compute totals.
    let series = build_series(records, &config.selection, config.gap_policy);
    tracing::info!(
        selection = %config.selection,
        selected = series.records_selected,
        products = series.totals.len(),
        "built monthly series"
    );
    if series.is_empty() {
        tracing::info!(selection = %config.selection, "nothing selected; report will be empty");
    }

    // 4) Fit and forecast each product independently.
    let opts = ForecastOptions {
        horizon: config.horizon,
        min_observations: config.min_observations,
        jobs: config.jobs,
    };
    let batch = forecast_all(&series.series, &opts)?;
    tracing::info!(
        fitted = batch.forecasts.len(),
        skipped = batch.skipped.len(),
        "forecast complete"
    );

    // 5) Merge totals with forecasts.
    let report = assemble_report(&series.totals, &batch.forecasts)?;

    Ok(RunOutput {
        records_read: records.len(),
        series,
        batch,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_table_from_reader;
    use crate::io::export::write_report_csv_to;
    use std::collections::BTreeSet;

    const HEADER: &str = "Product Name,Date of Sale,Quantity,Type,Store\n";

    fn scenario_csv() -> String {
        let mut csv = String::from(HEADER);
        let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
        let qty = [10, 12, 11, 13, 9, 14];
        for (m, q) in months.iter().zip(qty) {
            // Split each month over two days to exercise bucketing.
            csv.push_str(&format!("Widget A,03-{m}-23,{},EW,S1\n", q - 4));
            csv.push_str(&format!("Widget A,20-{m}-23,4,EW,S2\n"));
        }
        csv.push_str("Widget B,15-Mar-23,5,EW,S1\n");
        csv.push_str("Gadget R,15-Mar-23,7,RET,S1\n");
        csv
    }

    fn run(csv: &str, selection: &str) -> RunOutput {
        let table = read_table_from_reader(csv.as_bytes()).unwrap();
        let config = ForecastConfig::new("memory.csv", selection);
        run_forecast_with_table(&config, &table).unwrap()
    }

    #[test]
    fn widget_scenario() {
        let out = run(&scenario_csv(), "EW");

        assert_eq!(out.report.len(), 2);
        let a = &out.report[0];
        let b = &out.report[1];
        assert_eq!(a.product_name, "Widget A");
        assert_eq!(a.total_quantity_sold, 69.0);
        assert!(a.forecast_sum.is_some());
        assert_eq!(b.product_name, "Widget B");
        assert_eq!(b.total_quantity_sold, 5.0);
        assert_eq!(b.forecast_sum, None);

        assert_eq!(out.batch.skipped.len(), 1);
        assert!(out.batch.skipped[0].reason.contains("insufficient data"));
        assert_eq!(out.series.series[0].quantities(), vec![10.0, 12.0, 11.0, 13.0, 9.0, 14.0]);
    }

    #[test]
    fn other_type_products_are_absent() {
        let out = run(&scenario_csv(), "EW");
        assert!(out.report.iter().all(|r| r.product_name != "Gadget R"));

        let ret = run(&scenario_csv(), "RET");
        let names: Vec<_> = ret.report.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["Gadget R"]);
    }

    #[test]
    fn report_products_equal_selected_products_and_forecasts_are_a_subset() {
        let out = run(&scenario_csv(), "EW");
        let selected: BTreeSet<_> = out.series.totals.iter().map(|t| t.product_name.clone()).collect();
        let reported: BTreeSet<_> = out.report.iter().map(|r| r.product_name.clone()).collect();
        let forecast: BTreeSet<_> = out.batch.forecasts.iter().map(|f| f.product_name.clone()).collect();
        assert_eq!(selected, reported);
        assert!(forecast.is_subset(&reported));
    }

    #[test]
    fn output_is_byte_identical_across_runs() {
        let render = || {
            let out = run(&scenario_csv(), "EW");
            let mut buf = Vec::new();
            write_report_csv_to(&mut buf, &out.report).unwrap();
            buf
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn empty_selection_produces_empty_report() {
        let out = run(&scenario_csv(), "WHOLESALE");
        assert!(out.report.is_empty());
        assert!(out.batch.forecasts.is_empty());
    }

    #[test]
    fn malformed_date_aborts_the_run() {
        let csv = format!("{HEADER}Widget A,2023-01-05,1,EW,S1\n");
        let table = read_table_from_reader(csv.as_bytes()).unwrap();
        let config = ForecastConfig::new("memory.csv", "EW");
        let err = run_forecast_with_table(&config, &table).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let mut config = ForecastConfig::new("memory.csv", "EW");
        config.horizon = 0;
        assert!(validate_config(&config).is_err());
        let mut config = ForecastConfig::new("memory.csv", "EW");
        config.min_observations = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn blank_selection_produces_empty_report() {
        let out = run(&scenario_csv(), "  ");
        assert!(out.series.is_empty());
        assert!(out.report.is_empty());
    }

    #[test]
    fn blank_product_row_under_other_type_does_not_abort() {
        let csv = format!("{HEADER}Widget A,05-Jan-23,3,EW,S1\n,06-Jan-23,2,RET,S1\n");
        let out = run(&csv, "EW");
        assert_eq!(out.records_read, 2);
        assert_eq!(out.report.len(), 1);
        assert_eq!(out.report[0].product_name, "Widget A");
        assert_eq!(out.report[0].total_quantity_sold, 3.0);
    }
}
