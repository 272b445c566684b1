//! Config command implementation.

use crate::settings::{Settings, mask};
use anyhow::Result;
use std::path::Path;

/// Server database variables that the SQLite sink does not read.
const UNUSED_DB_VARS: &[&str] = &["DB_SERVER", "DB_NAME", "DB_USER", "DB_PASSWORD"];

/// Print the resolved configuration with secrets masked.
pub(crate) fn show_config(settings: &Settings, dotenv_loaded: bool) -> Result<()> {
    println!("{}", "=".repeat(60));
    println!("Configuration Status");
    println!("{}", "=".repeat(60));

    let env_file = if dotenv_loaded {
        "found"
    } else if Path::new(".env").exists() {
        "present but unreadable"
    } else {
        "not found"
    };
    println!("\n.env file: {env_file}");

    println!("\nDatabase:");
    let db_path = settings.db_path();
    println!("  path:  {}", db_path.display());
    println!(
        "  state: {}",
        if db_path.exists() { "exists" } else { "will be created" }
    );
    println!("  table: {}", settings.table());

    let unused: Vec<(&str, String)> = UNUSED_DB_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok().map(|value| (*var, value)))
        .collect();
    if !unused.is_empty() {
        println!("\nIgnored variables (server database settings):");
        for (var, value) in unused {
            let shown = if var.contains("PASSWORD") {
                mask(&value)
            } else {
                value
            };
            println!("  {var}: {shown}");
        }
    }

    println!("\nAPI:");
    println!("  timeout:     {}s", settings.api_timeout());
    println!("  max_retries: {}", settings.api_max_retries());
    println!("  page_size:   {}", settings.api_page_size());
    println!("  max_pages:   {}", settings.api_max_pages());
    println!("  lang:        {}", settings.api_lang());

    println!("\nLogging:");
    match std::env::var("RUST_LOG") {
        Ok(filter) => println!("  filter: {filter} (RUST_LOG)"),
        Err(_) => println!("  level:  {}", settings.log_level().unwrap_or("info")),
    }

    match settings.validate() {
        Ok(()) => println!("\nStatus: ok"),
        Err(e) => println!("\nStatus: invalid ({e})"),
    }
    println!("{}", "=".repeat(60));

    Ok(())
}
