//! Rendered board row parsing.

use tracing::{debug, warn};
use trowel_fetch::{BoardRow, BoardSnapshot};
use trowel_instruments::InstrumentCatalog;
use trowel_normalize::{DateInput, DateStrategy};
use trowel_types::{CanonicalRecord, InstrumentMeta, ScrapeStamp};

use crate::coerce::coerce_board_price;
use crate::record::keep;

/// Maps rendered board rows to canonical records.
///
/// The board shows one price per instrument with no market split, so records
/// carry the price as their sell price and no transaction type.
#[derive(Debug, Clone, Copy)]
pub struct BoardParser<'c> {
    catalog: &'c InstrumentCatalog,
    strategy: DateStrategy,
}

impl<'c> BoardParser<'c> {
    /// Creates a parser backed by `catalog`, using the board date ordering.
    #[must_use]
    pub const fn new(catalog: &'c InstrumentCatalog) -> Self {
        Self {
            catalog,
            strategy: DateStrategy::BOARD,
        }
    }

    /// Parses one row.
    ///
    /// Returns `None` if the display name is not in the catalog.
    #[must_use]
    pub fn parse_row(&self, row: BoardRow<'_>, collected_at: ScrapeStamp) -> Option<CanonicalRecord> {
        let Some(known) = self.catalog.by_name(row.name) else {
            debug!(name = row.name, "unknown board name, row skipped");
            return None;
        };
        let meta = InstrumentMeta::new(
            known.id(),
            known.symbol(),
            known.name(),
            None,
            known.asset_type(),
        );

        let mut skipped = Vec::new();
        let date = keep(
            "date",
            self.strategy.apply(Some(DateInput::Text(row.date))),
            &mut skipped,
        );
        let price = keep("price", coerce_board_price(row.price), &mut skipped);

        for field in &skipped {
            warn!(symbol = meta.symbol(), field = %field.field, reason = %field.reason, "field nulled");
        }

        Some(CanonicalRecord::new(&meta, date, price, None, collected_at).with_skipped(skipped))
    }

    /// Parses every row of a snapshot in page order.
    #[must_use]
    pub fn parse_snapshot(
        &self,
        snapshot: &BoardSnapshot,
        collected_at: ScrapeStamp,
    ) -> Vec<CanonicalRecord> {
        snapshot
            .rows()
            .filter_map(|row| self.parse_row(row, collected_at))
            .collect()
    }
}
