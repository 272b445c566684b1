//! Info command implementation.

use anyhow::Result;
use trowel_lib::Endpoint;
use trowel_lib::prelude::*;

/// Show one instrument with its history endpoint.
pub(crate) fn show_info(id: u32) -> Result<()> {
    let catalog = InstrumentCatalog::builtin();
    let instrument = catalog.require(id)?;

    println!("Instrument: {}", instrument.name());
    println!("ID:         {}", instrument.id());
    println!("Symbol:     {}", instrument.symbol());
    println!("Asset type: {} ({})", instrument.asset_type(), instrument.asset_type().local());

    match instrument.transaction_type() {
        Some(kind) => println!("Type:       {} ({})", kind, kind.local()),
        None => println!("Type:       -"),
    }

    match Endpoint::for_instrument(instrument) {
        Some(endpoint) => println!("Endpoint:   {}", endpoint.url()),
        None => println!("Endpoint:   none (board only)"),
    }

    Ok(())
}
