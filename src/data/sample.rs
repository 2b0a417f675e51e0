//! Synthetic sales transaction generation.
//!
//! Produces a CSV in the same layout the forecaster ingests, so the pipeline
//! can be demonstrated and smoke-tested without real sales exports. Output is
//! fully determined by the seed.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{SampleConfig, TransactionRecord};
use crate::error::AppError;
use crate::io::ingest::{COL_DATE, COL_PRODUCT, COL_QUANTITY, COL_TYPE, SALE_DATE_FORMAT};
use crate::series::calendar::next_month_end;

/// Type tag used for the decoy transactions that the selection should drop.
const OTHER_KIND: &str = "RET";
const COL_UNIT_PRICE: &str = "Unit Price";

/// Probability that a product has no sales at all in a given month.
const P_EMPTY_MONTH: f64 = 0.08;
/// Probability that a transaction is tagged with `OTHER_KIND`.
const P_OTHER_KIND: f64 = 0.15;

/// Generate synthetic transactions, ordered by product then date.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<TransactionRecord>, AppError> {
    if config.products == 0 {
        return Err(AppError::ingestion("Product count must be > 0."));
    }
    if config.months == 0 {
        return Err(AppError::ingestion("Month count must be > 0."));
    }
    if config.kind.trim().is_empty() {
        return Err(AppError::ingestion("Sample type must not be empty."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::ingestion(format!("Noise distribution error: {e}")))?;

    let mut records = Vec::new();
    let mut line = 2usize;

    for p in 0..config.products {
        let product_name = format!("Product {:02}", p + 1);
        let level = rng.gen_range(20.0..200.0_f64);
        let trend = rng.gen_range(-0.02..0.04_f64) * level;
        let season = rng.gen_range(0.0..0.3_f64) * level;
        let price = rng.gen_range(2.0..80.0_f64);

        let mut month_start = NaiveDate::from_ymd_opt(config.start.year(), config.start.month(), 1)
            .ok_or_else(|| AppError::ingestion("Invalid sample start date."))?;

        for m in 0..config.months {
            let t = m as f64;
            let phase = 2.0 * std::f64::consts::PI * (month_start.month0() as f64) / 12.0;
            let mean = level + trend * t + season * phase.sin();
            let demand = (mean + 0.15 * level * noise.sample(&mut rng)).round().max(0.0);

            // Keep the first month so every product has at least one sale.
            let skip_month = m > 0 && rng.gen_bool(P_EMPTY_MONTH);
            if !skip_month && demand > 0.0 {
                for (day, quantity) in split_demand(&mut rng, demand) {
                    let sale_date = month_start.with_day(day).unwrap_or(month_start);
                    let kind = if rng.gen_bool(P_OTHER_KIND) {
                        OTHER_KIND.to_string()
                    } else {
                        config.kind.clone()
                    };
                    let mut extra = BTreeMap::new();
                    extra.insert(COL_UNIT_PRICE.to_string(), format!("{price:.2}"));
                    records.push(TransactionRecord {
                        product_name: product_name.clone(),
                        sale_date,
                        quantity,
                        kind,
                        extra,
                        line,
                    });
                    line += 1;
                }
            }

            month_start = next_month_end(month_start)
                .with_day(1)
                .ok_or_else(|| AppError::ingestion("Sample date overflow."))?;
        }
    }

    Ok(records)
}

/// Split a month's demand over 1..=4 transactions on distinct-ish days.
fn split_demand(rng: &mut StdRng, demand: f64) -> Vec<(u32, f64)> {
    let n = rng.gen_range(1..=4usize).min(demand as usize).max(1);
    let mut days: Vec<u32> = (0..n).map(|_| rng.gen_range(1..=28)).collect();
    days.sort_unstable();

    let base = (demand / n as f64).floor();
    let mut out: Vec<(u32, f64)> = days.into_iter().map(|d| (d, base)).collect();
    let remainder = demand - base * n as f64;
    if let Some(last) = out.last_mut() {
        last.1 += remainder;
    }
    out
}

/// Write transactions in the ingest layout.
pub fn write_sample_csv(path: &Path, records: &[TransactionRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::ingestion(format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    write_sample_csv_to(file, records)
}

pub fn write_sample_csv_to<W: Write>(writer: W, records: &[TransactionRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    let err = |e: csv::Error| AppError::ingestion(format!("Failed to write sample CSV: {e}"));

    writer
        .write_record([COL_PRODUCT, COL_DATE, COL_QUANTITY, COL_TYPE, COL_UNIT_PRICE])
        .map_err(err)?;
    for r in records {
        let date = r.sale_date.format(SALE_DATE_FORMAT).to_string();
        let quantity = format!("{:.0}", r.quantity);
        let price = r.extra.get(COL_UNIT_PRICE).map(String::as_str).unwrap_or("");
        writer
            .write_record([r.product_name.as_str(), date.as_str(), quantity.as_str(), r.kind.as_str(), price])
            .map_err(err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::ingestion(format!("Failed to flush sample CSV: {e}")))?;
    Ok(())
}
