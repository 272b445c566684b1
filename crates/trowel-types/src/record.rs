//! Canonical record representation.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{AssetType, InstrumentMeta, SkippedField, TransactionType};

/// Moment a run collected its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrapeStamp(NaiveDateTime);

impl ScrapeStamp {
    /// Creates a stamp from a local timestamp.
    #[must_use]
    pub const fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Creates a stamp for the current local time, truncated to seconds.
    #[must_use]
    pub fn now() -> Self {
        let now = chrono::Local::now().naive_local();
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    /// Returns the underlying timestamp.
    #[must_use]
    pub const fn at(&self) -> NaiveDateTime {
        self.0
    }

    /// Returns the date part as `YYYY-MM-DD`.
    #[must_use]
    pub fn date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Returns the time part as `HH:MM:SS`.
    #[must_use]
    pub fn time(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }

    /// Returns the combined form `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn datetime(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Deduplication key: (`date`, `symbol`, `transaction type`).
///
/// The transaction type is held as its English label so keys loaded from a
/// sink compare equal to keys built from fresh records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    /// Jalali date string, if known.
    pub date: Option<String>,
    /// Instrument symbol.
    pub symbol: String,
    /// English transaction type label, if any.
    pub transaction_type: Option<String>,
}

impl RecordKey {
    /// Creates a new key.
    #[must_use]
    pub fn new(
        date: Option<impl Into<String>>,
        symbol: impl Into<String>,
        transaction_type: Option<TransactionType>,
    ) -> Self {
        Self {
            date: date.map(Into::into),
            symbol: symbol.into(),
            transaction_type: transaction_type.map(|t| t.english().to_string()),
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.date.as_deref().unwrap_or("-"),
            self.symbol,
            self.transaction_type.as_deref().unwrap_or("-")
        )
    }
}

/// A normalized price row, the unit that is deduplicated and persisted.
///
/// Records are built once per run and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    date: Option<String>,
    name: String,
    sell_price: Option<i64>,
    buy_price: Option<i64>,
    symbol: String,
    transaction_type: Option<TransactionType>,
    asset_type: AssetType,
    scraped_at: ScrapeStamp,
    #[serde(skip)]
    skipped: Vec<SkippedField>,
}

impl CanonicalRecord {
    /// Creates a record for `meta` with the given field values.
    #[must_use]
    pub fn new(
        meta: &InstrumentMeta,
        date: Option<String>,
        sell_price: Option<i64>,
        buy_price: Option<i64>,
        scraped_at: ScrapeStamp,
    ) -> Self {
        Self {
            date,
            name: meta.name().to_string(),
            sell_price,
            buy_price,
            symbol: meta.symbol().to_string(),
            transaction_type: meta.transaction_type(),
            asset_type: meta.asset_type(),
            scraped_at,
            skipped: Vec::new(),
        }
    }

    /// Attaches the fields that were dropped while building this record.
    #[must_use]
    pub fn with_skipped(mut self, skipped: Vec<SkippedField>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Returns the deduplication key.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::new(
            self.date.as_deref(),
            self.symbol.as_str(),
            self.transaction_type,
        )
    }

    /// Returns the Jalali date.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the sell price (or the single price for board rows).
    #[must_use]
    pub const fn sell_price(&self) -> Option<i64> {
        self.sell_price
    }

    /// Returns the buy price.
    #[must_use]
    pub const fn buy_price(&self) -> Option<i64> {
        self.buy_price
    }

    /// Returns the instrument symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the transaction type.
    #[must_use]
    pub const fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }

    /// Returns the asset category.
    #[must_use]
    pub const fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Returns the collection stamp.
    #[must_use]
    pub const fn scraped_at(&self) -> ScrapeStamp {
        self.scraped_at
    }

    /// Returns the fields dropped while building this record.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedField] {
        &self.skipped
    }
}
