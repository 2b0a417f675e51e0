//! Month-end calendar helpers.

use chrono::{Datelike, NaiveDate};

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = next_month(date.year(), date.month());
    // The first of the following month always exists, so the fallback is unreachable.
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Month end of the month following the month containing `date`.
pub fn next_month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = next_month(date.year(), date.month());
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(month_end)
        .unwrap_or(date)
}

/// Number of whole months from `a` to `b` (negative if `b` is earlier).
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b.year() as i64 - a.year() as i64) * 12 + (b.month() as i64 - a.month() as i64)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}
