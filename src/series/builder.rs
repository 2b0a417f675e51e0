//! Turn normalized transactions into per-product monthly series and totals.
//!
//! Products are keyed in a `BTreeMap`, so every output of this module iterates
//! in lexical order of product name. The forecast and report stages rely on
//! that order for reproducible output.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{GapPolicy, MonthlyPoint, ProductSeries, ProductTotal, TransactionRecord};
use crate::series::calendar::{month_end, months_between, next_month_end};

/// Output of the series builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    /// One series per product with at least one selected transaction.
    pub series: Vec<ProductSeries>,
    /// Historical demand per product, same products and order as `series`.
    pub totals: Vec<ProductTotal>,
    /// Number of named transactions that matched the selection.
    pub records_selected: usize,
}

impl SeriesSet {
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Filter by `Type`, bucket by calendar month and sum per product.
///
/// The selection is compared exactly (case-sensitive) after trimming.
pub fn build_series(records: &[TransactionRecord], selection: &str, gaps: GapPolicy) -> SeriesSet {
    let selection = selection.trim();

    let mut buckets: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut records_selected = 0usize;
    let mut unnamed = 0usize;

    for record in records.iter().filter(|r| r.kind == selection) {
        if record.product_name.is_empty() {
            unnamed += 1;
            continue;
        }
        records_selected += 1;
        let name = record.product_name.as_str();
        *buckets
            .entry(name)
            .or_default()
            .entry(month_end(record.sale_date))
            .or_insert(0.0) += record.quantity;
        *totals.entry(name).or_insert(0.0) += record.quantity;
    }

    if unnamed > 0 {
        tracing::warn!(selection, rows = unnamed, "dropping selected rows with a blank product name");
    }

    if records_selected == 0 {
        tracing::warn!(selection, "no transactions match the selected type");
        return SeriesSet::default();
    }

    let series = buckets
        .into_iter()
        .map(|(name, months)| ProductSeries {
            product_name: name.to_string(),
            points: resample(&months, gaps),
        })
        .collect();

    let totals = totals
        .into_iter()
        .map(|(name, total_quantity)| ProductTotal {
            product_name: name.to_string(),
            total_quantity,
        })
        .collect();

    SeriesSet {
        series,
        totals,
        records_selected,
    }
}

/// Expand observed month buckets into a series according to the gap policy.
fn resample(months: &BTreeMap<NaiveDate, f64>, gaps: GapPolicy) -> Vec<MonthlyPoint> {
    match gaps {
        GapPolicy::Omit => months
            .iter()
            .map(|(&period_end, &quantity)| MonthlyPoint { period_end, quantity })
            .collect(),
        GapPolicy::ZeroFill => {
            let (Some((&first, _)), Some((&last, _))) = (months.first_key_value(), months.last_key_value())
            else {
                return Vec::new();
            };
            let mut out = Vec::with_capacity(months_between(first, last).max(0) as usize + 1);
            let mut period_end = first;
            while period_end <= last {
                out.push(MonthlyPoint {
                    period_end,
                    quantity: months.get(&period_end).copied().unwrap_or(0.0),
                });
                period_end = next_month_end(period_end);
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(product: &str, date: (i32, u32, u32), qty: f64, kind: &str) -> TransactionRecord {
        TransactionRecord {
            product_name: product.to_string(),
            sale_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            quantity: qty,
            kind: kind.to_string(),
            extra: BTreeMap::new(),
            line: 0,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_month_transactions_share_one_point() {
        let records = vec![
            rec("A", (2023, 1, 5), 3.0, "EW"),
            rec("A", (2023, 1, 28), 4.0, "EW"),
            rec("A", (2023, 2, 1), 1.0, "EW"),
        ];
        let set = build_series(&records, "EW", GapPolicy::ZeroFill);
        assert_eq!(set.series.len(), 1);
        let points = &set.series[0].points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period_end, d(2023, 1, 31));
        assert_eq!(points[0].quantity, 7.0);
        assert_eq!(points[1].period_end, d(2023, 2, 28));
    }

    #[test]
    fn filter_is_exact_and_case_sensitive() {
        let records = vec![
            rec("A", (2023, 1, 5), 3.0, "EW"),
            rec("B", (2023, 1, 5), 3.0, "ew"),
            rec("C", (2023, 1, 5), 3.0, "RET"),
        ];
        let set = build_series(&records, " EW ", GapPolicy::ZeroFill);
        let names: Vec<_> = set.totals.iter().map(|t| t.product_name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
        assert_eq!(set.records_selected, 1);
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let records = vec![rec("A", (2023, 1, 5), 3.0, "RET")];
        let set = build_series(&records, "EW", GapPolicy::ZeroFill);
        assert!(set.is_empty());
        assert!(set.series.is_empty());
    }

    #[test]
    fn blank_product_names_are_left_out_of_grouping() {
        let records = vec![
            rec("A", (2023, 1, 5), 3.0, "EW"),
            rec("", (2023, 1, 6), 9.0, "EW"),
        ];
        let set = build_series(&records, "EW", GapPolicy::ZeroFill);
        assert_eq!(set.totals, vec![ProductTotal { product_name: "A".into(), total_quantity: 3.0 }]);
        assert_eq!(set.series.len(), 1);
        assert_eq!(set.records_selected, 1);
    }

    #[test]
    fn zero_fill_inserts_missing_months() {
        let records = vec![
            rec("A", (2023, 11, 2), 5.0, "EW"),
            rec("A", (2024, 2, 10), 2.0, "EW"),
        ];
        let set = build_series(&records, "EW", GapPolicy::ZeroFill);
        let q = set.series[0].quantities();
        assert_eq!(q, vec![5.0, 0.0, 0.0, 2.0]);
        assert_eq!(set.series[0].points[2].period_end, d(2024, 1, 31));
    }

    #[test]
    fn omit_keeps_only_observed_months() {
        let records = vec![
            rec("A", (2023, 11, 2), 5.0, "EW"),
            rec("A", (2024, 2, 10), 2.0, "EW"),
        ];
        let set = build_series(&records, "EW", GapPolicy::Omit);
        assert_eq!(set.series[0].quantities(), vec![5.0, 2.0]);
    }

    #[test]
    fn totals_sum_all_selected_records_in_lexical_order() {
        let records = vec![
            rec("Widget B", (2023, 3, 1), 5.0, "EW"),
            rec("Widget A", (2023, 1, 1), 10.0, "EW"),
            rec("Widget A", (2023, 4, 1), 2.5, "EW"),
            rec("Widget A", (2023, 4, 9), 1.0, "RET"),
        ];
        let set = build_series(&records, "EW", GapPolicy::ZeroFill);
        assert_eq!(
            set.totals,
            vec![
                ProductTotal { product_name: "Widget A".into(), total_quantity: 12.5 },
                ProductTotal { product_name: "Widget B".into(), total_quantity: 5.0 },
            ]
        );
        let series_total: f64 = set.series[0].quantities().iter().sum();
        assert_eq!(series_total, 12.5);
    }
}
