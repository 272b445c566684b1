//! Synthetic inputs for trowel benchmarks.

use serde_json::json;
use std::collections::HashSet;
use trowel_lib::{CanonicalRecord, InstrumentCatalog, RawItem, RecordKey, ScrapeStamp};

/// Jalali year used for generated histories.
pub const BASE_YEAR: i32 = 1400;

/// Returns the compact Jalali date for the `n`th day of a 360-day cycle.
pub fn compact_date(n: usize) -> String {
    let year = BASE_YEAR + (n / 360) as i32;
    let month = (n % 360) / 30 + 1;
    let day = n % 30 + 1;
    format!("{year:04}{month:02}{day:02}")
}

/// Builds `days` raw API items with Persian-digit prices every other day.
pub fn raw_history(days: usize) -> Vec<RawItem> {
    (0..days)
        .map(|n| {
            let sell = 500_000 + n as i64;
            let sell = if n % 2 == 0 {
                json!(sell.to_string())
            } else {
                json!(persian(sell))
            };
            RawItem::new()
                .with("date", compact_date(n))
                .with("sell_price", sell)
                .with("buy_price", json!(null))
        })
        .collect()
}

/// Builds `days` canonical records per API instrument of the builtin catalog.
pub fn records(catalog: &InstrumentCatalog, days: usize) -> Vec<CanonicalRecord> {
    let stamp = ScrapeStamp::now();
    catalog
        .all()
        .filter(|meta| meta.transaction_type().is_some())
        .flat_map(|meta| {
            (0..days).map(move |n| {
                CanonicalRecord::new(
                    meta,
                    Some(format!("{}/{:02}/{:02}", BASE_YEAR, n % 12 + 1, n % 29 + 1)),
                    Some(500_000 + n as i64),
                    None,
                    stamp,
                )
            })
        })
        .collect()
}

/// Keys of the first `share` (0.0 to 1.0) of `records`.
pub fn existing_keys(records: &[CanonicalRecord], share: f64) -> HashSet<RecordKey> {
    let take = (records.len() as f64 * share.clamp(0.0, 1.0)) as usize;
    records.iter().take(take).map(CanonicalRecord::key).collect()
}

fn persian(value: i64) -> String {
    value
        .to_string()
        .chars()
        .map(|c| c.to_digit(10).map_or(c, |d| trowel_lib::PERSIAN_DIGITS[d as usize]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_date_cycle() {
        assert_eq!(compact_date(0), "14000101");
        assert_eq!(compact_date(359), "14001230");
        assert_eq!(compact_date(360), "14010101");
    }

    #[test]
    fn test_persian_digits() {
        assert_eq!(persian(120), "۱۲۰");
    }

    #[test]
    fn test_existing_keys_share() {
        let catalog = InstrumentCatalog::builtin();
        let records = records(&catalog, 10);
        assert_eq!(existing_keys(&records, 0.5).len(), records.len() / 2);
    }
}
