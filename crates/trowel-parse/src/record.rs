//! API item parsing.

use tracing::{debug, warn};
use trowel_instruments::InstrumentCatalog;
use trowel_normalize::DateStrategy;
use trowel_types::{CanonicalRecord, FieldOutcome, RawItem, ScrapeStamp, SkippedField};

use crate::coerce::{coerce_date, coerce_price};

/// Keys that may carry the sell price, in priority order.
pub const SELL_PRICE_KEYS: &[&str] = &["sell_price", "price"];

/// Maps raw API items to canonical records.
#[derive(Debug, Clone, Copy)]
pub struct RecordParser<'c> {
    catalog: &'c InstrumentCatalog,
    strategy: DateStrategy,
}

impl<'c> RecordParser<'c> {
    /// Creates a parser backed by `catalog`, using the API date ordering.
    #[must_use]
    pub const fn new(catalog: &'c InstrumentCatalog) -> Self {
        Self {
            catalog,
            strategy: DateStrategy::API,
        }
    }

    /// Returns the catalog.
    #[must_use]
    pub const fn catalog(&self) -> &'c InstrumentCatalog {
        self.catalog
    }

    /// Parses one item fetched for `instrument_id`.
    ///
    /// Returns `None` if the id is not in the catalog. Malformed fields are
    /// nulled, listed on the record, and logged.
    #[must_use]
    pub fn parse(
        &self,
        item: &RawItem,
        collected_at: ScrapeStamp,
        instrument_id: u32,
    ) -> Option<CanonicalRecord> {
        let Some(meta) = self.catalog.get(instrument_id) else {
            debug!(instrument_id, "unknown instrument, item skipped");
            return None;
        };

        let mut skipped = Vec::new();
        let date = keep(
            "date",
            coerce_date(item.get("date"), self.strategy),
            &mut skipped,
        );
        let sell = keep(
            "sell_price",
            coerce_price(item.first_of(SELL_PRICE_KEYS)),
            &mut skipped,
        );
        let buy = keep("buy_price", coerce_price(item.get("buy_price")), &mut skipped);

        for field in &skipped {
            warn!(instrument_id, field = %field.field, reason = %field.reason, "field nulled");
        }

        Some(CanonicalRecord::new(meta, date, sell, buy, collected_at).with_skipped(skipped))
    }

    /// Parses a batch of items for one instrument, dropping unknown ids.
    pub fn parse_all<'a>(
        &'a self,
        items: &'a [RawItem],
        collected_at: ScrapeStamp,
        instrument_id: u32,
    ) -> impl Iterator<Item = CanonicalRecord> + 'a {
        items
            .iter()
            .filter_map(move |item| self.parse(item, collected_at, instrument_id))
    }
}

/// Unwraps a field outcome, recording the reason when the value was dropped.
pub(crate) fn keep<T>(
    field: &str,
    outcome: FieldOutcome<T>,
    skipped: &mut Vec<SkippedField>,
) -> Option<T> {
    outcome.unwrap_or_else(|reason| {
        skipped.push(SkippedField::new(field, reason));
        None
    })
}
