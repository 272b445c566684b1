//! List command implementation.
//!
//! This module handles listing catalog instruments with optional filtering.

use anyhow::{Result, bail};
use trowel_lib::prelude::*;

/// Parses a transaction type filter.
pub(crate) fn parse_transaction_type(s: &str) -> Result<TransactionType> {
    match s.to_lowercase().as_str() {
        "bill" | "cash" => Ok(TransactionType::Bill),
        "wire" | "wiretransfer" | "wire_transfer" | "transfer" => Ok(TransactionType::WireTransfer),
        _ => bail!("Unknown transaction type: {s}. Valid types: bill, wire"),
    }
}

/// List catalog instruments with an optional type filter or search pattern.
pub(crate) fn list_instruments(transaction_type: Option<&str>, search: Option<&str>) -> Result<()> {
    let catalog = InstrumentCatalog::builtin();

    let instruments: Vec<_> = match (transaction_type, search) {
        (Some(kind), _) => {
            let kind = parse_transaction_type(kind)?;
            catalog.by_transaction_type(kind).collect()
        }
        (_, Some(pattern)) => catalog.search(pattern),
        (None, None) => catalog.all().collect(),
    };

    if instruments.is_empty() {
        println!("No instruments found.");
        return Ok(());
    }

    println!("{:<6} {:<10} {:<14} NAME", "ID", "SYMBOL", "TYPE");
    println!("{}", "-".repeat(50));

    for instrument in &instruments {
        let kind = instrument
            .transaction_type()
            .map_or("-", |t| t.english());
        println!(
            "{:<6} {:<10} {:<14} {}",
            instrument.id(),
            instrument.symbol(),
            kind,
            instrument.name()
        );
    }

    println!("\nTotal: {} instruments", instruments.len());
    Ok(())
}
