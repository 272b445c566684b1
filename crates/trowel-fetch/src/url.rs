//! History endpoint construction.

use trowel_instruments::InstrumentCatalog;
use trowel_types::{InstrumentMeta, TransactionType};

/// Base URL of the exchange API.
pub const BASE_URL: &str = "https://api.ice.ir/api/v1";

/// Builds the price-history URL for one currency on one market.
///
/// URL format: `{BASE_URL}/markets/{MARKET}/currencies/history/{ID}/`
///
/// # Example
///
/// ```
/// use trowel_fetch::url::history_url;
///
/// let url = history_url(1, 14);
/// assert_eq!(url, "https://api.ice.ir/api/v1/markets/1/currencies/history/14/");
/// ```
#[must_use]
pub fn history_url(market: u8, currency_id: u32) -> String {
    format!("{BASE_URL}/markets/{market}/currencies/history/{currency_id}/")
}

/// One paginated endpoint, tied to the instrument it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    instrument_id: u32,
    transaction_type: TransactionType,
    url: String,
}

impl Endpoint {
    /// Builds the endpoint for `meta`.
    ///
    /// Returns `None` for instruments without a transaction type, which have
    /// no market to query.
    #[must_use]
    pub fn for_instrument(meta: &InstrumentMeta) -> Option<Self> {
        let transaction_type = meta.transaction_type()?;
        Some(Self {
            instrument_id: meta.id(),
            transaction_type,
            url: history_url(transaction_type.market(), meta.id()),
        })
    }

    /// Returns the instrument id.
    #[must_use]
    pub const fn instrument_id(&self) -> u32 {
        self.instrument_id
    }

    /// Returns the transaction type.
    #[must_use]
    pub const fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Returns the URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.instrument_id, self.transaction_type)
    }
}

/// Returns one endpoint per market-bound instrument in the catalog, in id order.
#[must_use]
pub fn endpoints(catalog: &InstrumentCatalog) -> Vec<Endpoint> {
    catalog.all().filter_map(Endpoint::for_instrument).collect()
}
