//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the forecast pipeline or the sample generator
//! - prints the summary and writes exports

use clap::Parser;

use crate::cli::{Command, ForecastArgs, SampleArgs};
use crate::domain::{ForecastConfig, SampleConfig};
use crate::error::AppError;
use crate::logging::{Verbosity, init_cli_logger};

pub mod pipeline;

/// Entry point for the `demand` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Forecast(args) => {
            init_cli_logger(Verbosity::from_flags(args.quiet, args.verbose));
            handle_forecast(args)
        }
        Command::Sample(args) => {
            init_cli_logger(Verbosity::from_flags(false, args.verbose));
            handle_sample(args)
        }
    }
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args);
    let run = pipeline::run_forecast(&config)?;

    crate::io::export::write_report_csv(&config.output_path, &run.report)?;
    tracing::info!(path = %config.output_path.display(), rows = run.report.len(), "wrote report CSV");

    if let Some(path) = &config.json_path {
        crate::io::export::write_report_json(path, &run.report, &run.batch, &config)?;
        tracing::info!(path = %path.display(), "wrote report JSON");
    }

    if config.print_summary {
        println!("{}", crate::report::format_run_summary(&run, &config));
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let records = crate::data::generate_sample(&config)?;
    crate::data::write_sample_csv(&config.output_path, &records)?;
    tracing::info!(
        path = %config.output_path.display(),
        transactions = records.len(),
        "wrote sample CSV"
    );
    Ok(())
}

pub fn forecast_config_from_args(args: &ForecastArgs) -> ForecastConfig {
    ForecastConfig {
        input_path: args.input.clone(),
        selection: args.kind.trim().to_string(),
        output_path: args.output.clone(),
        json_path: args.json.clone(),
        horizon: args.horizon,
        min_observations: args.min_observations,
        gap_policy: args.gaps,
        jobs: args.jobs,
        print_summary: !args.quiet,
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        output_path: args.output.clone(),
        products: args.products,
        months: args.months,
        seed: args.seed,
        kind: args.kind.trim().to_string(),
        start: args.start,
    }
}
