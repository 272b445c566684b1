//! Key-based delta detection.

use std::collections::HashSet;
use trowel_types::{CanonicalRecord, RecordKey};

/// Returns the records of `fresh` whose key is not in `existing`.
///
/// Order is preserved. Duplicates inside `fresh` are not collapsed, and an
/// empty `existing` returns `fresh` untouched.
#[must_use]
pub fn find_new(
    fresh: Vec<CanonicalRecord>,
    existing: &HashSet<RecordKey>,
) -> Vec<CanonicalRecord> {
    if existing.is_empty() {
        return fresh;
    }
    fresh
        .into_iter()
        .filter(|record| !existing.contains(&record.key()))
        .collect()
}

/// Drops records whose key already appeared earlier in `records`.
///
/// The first occurrence wins and order is preserved. Overlapping pages from
/// a source that shifted between requests yield such repeats.
#[must_use]
pub fn dedup_keys(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trowel_types::{AssetType, InstrumentMeta, ScrapeStamp, TransactionType};

    fn record(date: &str, symbol: &str, kind: TransactionType, price: i64) -> CanonicalRecord {
        let meta = InstrumentMeta::new(1, symbol, symbol, Some(kind), AssetType::Currency);
        CanonicalRecord::new(
            &meta,
            Some(date.into()),
            Some(price),
            None,
            ScrapeStamp::now(),
        )
    }

    fn sample() -> Vec<CanonicalRecord> {
        vec![
            record("1401-01-01", "USD", TransactionType::Bill, 1),
            record("1401-01-01", "USD", TransactionType::WireTransfer, 2),
            record("1401-01-02", "USD", TransactionType::Bill, 3),
            record("1401-01-01", "EUR", TransactionType::Bill, 4),
        ]
    }

    fn keys(records: &[CanonicalRecord]) -> HashSet<RecordKey> {
        records.iter().map(CanonicalRecord::key).collect()
    }

    #[test]
    fn test_empty_fresh() {
        let existing = keys(&sample());
        assert!(find_new(Vec::new(), &existing).is_empty());
    }

    #[test]
    fn test_empty_existing_is_identity() {
        let fresh = sample();
        assert_eq!(find_new(fresh.clone(), &HashSet::new()), fresh);
    }

    #[test]
    fn test_idempotent_against_own_keys() {
        let fresh = sample();
        let existing = keys(&fresh);
        assert!(find_new(fresh, &existing).is_empty());
    }

    #[test]
    fn test_filters_and_keeps_order() {
        let fresh = sample();
        let existing = keys(&fresh[1..2]);
        let new = find_new(fresh.clone(), &existing);
        assert_eq!(new, vec![fresh[0].clone(), fresh[2].clone(), fresh[3].clone()]);
    }

    #[test]
    fn test_key_ignores_price() {
        let existing = keys(&[record("1401-01-01", "USD", TransactionType::Bill, 999)]);
        let new = find_new(sample(), &existing);
        assert_eq!(new.len(), 3);
        assert!(new.iter().all(|r| r.sell_price() != Some(1)));
    }

    #[test]
    fn test_duplicates_pass_through() {
        let dup = record("1401-01-05", "USD", TransactionType::Bill, 7);
        let fresh = vec![dup.clone(), dup.clone()];
        assert_eq!(find_new(fresh.clone(), &HashSet::new()).len(), 2);

        let other = keys(&[record("1399-01-01", "AED", TransactionType::Bill, 0)]);
        assert_eq!(find_new(fresh, &other).len(), 2);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let first = record("1401-01-05", "USD", TransactionType::Bill, 7);
        let repeat = record("1401-01-05", "USD", TransactionType::Bill, 8);
        let wire = record("1401-01-05", "USD", TransactionType::WireTransfer, 9);
        let later = record("1401-01-04", "USD", TransactionType::Bill, 6);

        let unique = dedup_keys(vec![first.clone(), repeat, wire.clone(), later.clone()]);
        assert_eq!(unique, vec![first, wire, later]);
    }

    #[test]
    fn test_dedup_without_repeats_is_identity() {
        let fresh = sample();
        assert_eq!(dedup_keys(fresh.clone()), fresh);
        assert!(dedup_keys(Vec::new()).is_empty());
    }
}
