//! Tracing subscriber setup.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Workspace crates that follow `-v` beyond `info`.
const TROWEL_TARGETS: &[&str] = &[
    "trowel",
    "trowel_fetch",
    "trowel_instruments",
    "trowel_normalize",
    "trowel_parse",
    "trowel_pipeline",
    "trowel_store",
];

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins. Otherwise `--quiet` selects `warn`, then `LOG_LEVEL`,
/// then the `-v` count.
pub(crate) fn init(verbose: u8, quiet: bool, log_level: Option<&str>) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directives(verbose, quiet, log_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

fn directives(verbose: u8, quiet: bool, log_level: Option<&str>) -> String {
    let level = if quiet {
        "warn".to_string()
    } else if let Some(level) = log_level {
        normalize_level(level)
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string()
    };

    match level.as_str() {
        "debug" | "trace" => {
            let scoped: Vec<String> = TROWEL_TARGETS.iter().map(|t| format!("{t}={level}")).collect();
            format!("info,{}", scoped.join(","))
        }
        _ => level,
    }
}

/// Maps Python-style level names onto tracing levels.
fn normalize_level(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    }
}
