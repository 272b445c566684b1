//! Instrument catalog for the trowel price loader.
//!
//! The catalog is built once and passed by reference to every component that
//! needs instrument metadata; there is no global instance.
//!
//! # Example
//!
//! ```
//! use trowel_instruments::InstrumentCatalog;
//!
//! let catalog = InstrumentCatalog::builtin();
//!
//! if let Some(meta) = catalog.get(14) {
//!     println!("{}: {}", meta.symbol(), meta.name());
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use thiserror::Error;
use trowel_types::{InstrumentMeta, TransactionType};

/// The built-in catalog JSON embedded at compile time.
const INSTRUMENTS_JSON: &str = include_str!("../data/instruments.json");

/// Errors raised while building a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog JSON is malformed.
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two entries share the same id.
    #[error("Duplicate instrument id: {0}")]
    DuplicateId(u32),

    /// A lookup named an id the catalog does not hold.
    #[error("Unknown instrument: {0}")]
    Unknown(u32),
}

/// Immutable set of instruments keyed by source id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentCatalog {
    instruments: BTreeMap<u32, InstrumentMeta>,
}

impl InstrumentCatalog {
    /// Builds a catalog from instrument metadata.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two entries share an id.
    pub fn new(entries: impl IntoIterator<Item = InstrumentMeta>) -> Result<Self, CatalogError> {
        let mut instruments = BTreeMap::new();
        for meta in entries {
            let id = meta.id();
            if instruments.insert(id, meta).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(Self { instruments })
    }

    /// Builds a catalog from a JSON array of instrument entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or holds duplicate ids.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<InstrumentMeta> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Returns the built-in catalog.
    ///
    /// # Panics
    ///
    /// Panics if the embedded JSON is invalid, which the crate tests rule out.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_json(INSTRUMENTS_JSON).expect("Invalid instruments.json")
    }

    /// Looks up an instrument by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&InstrumentMeta> {
        self.instruments.get(&id)
    }

    /// Looks up an instrument by id, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unknown`] if the id is not in the catalog.
    pub fn require(&self, id: u32) -> Result<&InstrumentMeta, CatalogError> {
        self.get(id).ok_or(CatalogError::Unknown(id))
    }

    /// Returns the first instrument (lowest id) with the given display name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&InstrumentMeta> {
        let name = name.trim();
        self.instruments.values().find(|m| m.name() == name)
    }

    /// Returns all instruments in id order.
    pub fn all(&self) -> impl Iterator<Item = &InstrumentMeta> {
        self.instruments.values()
    }

    /// Returns instruments of the given transaction type.
    pub fn by_transaction_type(
        &self,
        kind: TransactionType,
    ) -> impl Iterator<Item = &InstrumentMeta> {
        self.instruments
            .values()
            .filter(move |m| m.transaction_type() == Some(kind))
    }

    /// Searches instruments by symbol or name (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&InstrumentMeta> {
        let pattern = pattern.to_lowercase();
        self.instruments
            .values()
            .filter(|m| {
                m.symbol().to_lowercase().contains(&pattern)
                    || m.name().to_lowercase().contains(&pattern)
            })
            .collect()
    }

    /// Returns all ids in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        self.instruments.keys().copied().collect()
    }

    /// Returns the number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
