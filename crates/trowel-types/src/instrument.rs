//! Instrument metadata definitions.

use serde::{Deserialize, Serialize};

/// How a currency is traded on the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Physical banknotes.
    Bill,
    /// Electronic transfer.
    WireTransfer,
}

impl TransactionType {
    /// Returns the English label persisted in the sink.
    #[must_use]
    pub const fn english(&self) -> &'static str {
        match self {
            Self::Bill => "Bill",
            Self::WireTransfer => "WireTransfer",
        }
    }

    /// Returns the Persian label persisted in the sink.
    #[must_use]
    pub const fn local(&self) -> &'static str {
        match self {
            Self::Bill => "اسکناس",
            Self::WireTransfer => "حواله",
        }
    }

    /// Returns the exchange market that publishes this transaction type.
    #[must_use]
    pub const fn market(&self) -> u8 {
        match self {
            Self::Bill => 1,
            Self::WireTransfer => 2,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.english())
    }
}

/// Asset category owned by a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Foreign currencies.
    #[default]
    Currency,
    /// Traded commodities (coins, metals).
    Commodity,
}

impl AssetType {
    /// Returns the English label persisted in the sink.
    #[must_use]
    pub const fn english(&self) -> &'static str {
        match self {
            Self::Currency => "Currency",
            Self::Commodity => "Commodity",
        }
    }

    /// Returns the Persian label persisted in the sink.
    #[must_use]
    pub const fn local(&self) -> &'static str {
        match self {
            Self::Currency => "ارز",
            Self::Commodity => "کالا",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.english())
    }
}

/// Static metadata for one source instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentMeta {
    /// Source-side identifier (e.g. 14 for USD banknotes).
    id: u32,
    /// Short code (e.g. "USD").
    symbol: String,
    /// Display name as published by the source.
    name: String,
    /// Transaction type, absent for single-instrument scrapes.
    #[serde(default)]
    transaction_type: Option<TransactionType>,
    /// Asset category.
    #[serde(default)]
    asset_type: AssetType,
}

impl InstrumentMeta {
    /// Creates new instrument metadata.
    #[must_use]
    pub fn new(
        id: u32,
        symbol: impl Into<String>,
        name: impl Into<String>,
        transaction_type: Option<TransactionType>,
        asset_type: AssetType,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            name: name.into(),
            transaction_type,
            asset_type,
        }
    }

    /// Returns the source identifier.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns the short symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the transaction type, if any.
    #[must_use]
    pub const fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }

    /// Returns the asset category.
    #[must_use]
    pub const fn asset_type(&self) -> AssetType {
        self.asset_type
    }
}

impl std::fmt::Display for InstrumentMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.transaction_type {
            Some(kind) => write!(f, "{} {} ({})", self.symbol, kind, self.id),
            None => write!(f, "{} ({})", self.symbol, self.id),
        }
    }
}
