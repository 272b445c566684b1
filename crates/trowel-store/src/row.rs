//! Flat persisted row layout.

use serde::Serialize;
use trowel_types::CanonicalRecord;

/// Column names in persisted order.
pub const COLUMNS: [&str; 12] = [
    "Date",
    "Name",
    "SellPrice",
    "BuyPrice",
    "Symbol",
    "TransactionTypeLocal",
    "TransactionTypeEnglish",
    "AssetTypeLocal",
    "AssetTypeEnglish",
    "ScrapedDate",
    "ScrapedTime",
    "ScrapedAt",
];

/// A canonical record flattened into its stored columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SinkRow {
    /// Jalali date.
    pub date: Option<String>,
    /// Display name.
    pub name: String,
    /// Sell price.
    pub sell_price: Option<i64>,
    /// Buy price.
    pub buy_price: Option<i64>,
    /// Instrument symbol.
    pub symbol: String,
    /// Persian transaction type label.
    pub transaction_type_local: Option<&'static str>,
    /// English transaction type label.
    pub transaction_type_english: Option<&'static str>,
    /// Persian asset type label.
    pub asset_type_local: &'static str,
    /// English asset type label.
    pub asset_type_english: &'static str,
    /// Scrape date, `YYYY-MM-DD`.
    pub scraped_date: String,
    /// Scrape time, `HH:MM:SS`.
    pub scraped_time: String,
    /// Scrape timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub scraped_at: String,
}

impl From<&CanonicalRecord> for SinkRow {
    fn from(record: &CanonicalRecord) -> Self {
        let kind = record.transaction_type();
        let asset = record.asset_type();
        let stamp = record.scraped_at();
        Self {
            date: record.date().map(str::to_string),
            name: record.name().to_string(),
            sell_price: record.sell_price(),
            buy_price: record.buy_price(),
            symbol: record.symbol().to_string(),
            transaction_type_local: kind.map(|k| k.local()),
            transaction_type_english: kind.map(|k| k.english()),
            asset_type_local: asset.local(),
            asset_type_english: asset.english(),
            scraped_date: stamp.date(),
            scraped_time: stamp.time(),
            scraped_at: stamp.datetime(),
        }
    }
}
