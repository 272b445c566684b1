//! Runtime configuration resolved from flags, the environment and `.env`.

use anyhow::{Context, Result, bail};
use clap::Args;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;
use trowel_lib::{ClientConfig, DEFAULT_TABLE, LoadConfig, PaginationLimits};

/// Substrings that mark a value copied from a template without editing.
const PLACEHOLDER_MARKERS: &[&str] = &["your_", "example", "placeholder", "changeme", "change_me"];

/// Fallback variable for the database path.
const DB_PATH_FALLBACK_VAR: &str = "DB_PATH";

/// Database file name inside the data directory.
const DB_FILE_NAME: &str = "trowel.sqlite3";

/// Tunables shared by every command.
#[derive(Debug, Clone, Args)]
pub(crate) struct Settings {
    /// SQLite database file [default: platform data directory]
    #[arg(long, env = "TROWEL_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Destination table
    #[arg(long, env = "DB_TABLE_NAME", default_value = DEFAULT_TABLE, global = true)]
    table: String,

    /// Request timeout in seconds
    #[arg(long, env = "API_TIMEOUT", default_value_t = 30, global = true)]
    api_timeout: u64,

    /// Retry attempts per page
    #[arg(long, env = "API_MAX_RETRIES", default_value_t = 3, global = true)]
    api_max_retries: u32,

    /// Items requested per page
    #[arg(long, env = "API_PAGE_SIZE", default_value_t = 1000, global = true)]
    api_page_size: usize,

    /// Page guard per endpoint
    #[arg(long, env = "API_MAX_PAGES", default_value_t = 10_000, global = true)]
    api_max_pages: usize,

    /// Value of the `lang` query parameter
    #[arg(long, env = "API_LANG", default_value = "fa", global = true)]
    api_lang: String,

    /// Log level used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", global = true)]
    log_level: Option<String>,
}

impl Settings {
    /// Returns the configured log level, if any.
    pub(crate) fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    pub(crate) fn table(&self) -> &str {
        &self.table
    }

    pub(crate) const fn api_timeout(&self) -> u64 {
        self.api_timeout
    }

    pub(crate) const fn api_max_retries(&self) -> u32 {
        self.api_max_retries
    }

    pub(crate) const fn api_page_size(&self) -> usize {
        self.api_page_size
    }

    pub(crate) const fn api_max_pages(&self) -> usize {
        self.api_max_pages
    }

    pub(crate) fn api_lang(&self) -> &str {
        &self.api_lang
    }

    /// Resolves the database path: flag or `TROWEL_DB_PATH`, then `DB_PATH`,
    /// then the platform data directory.
    pub(crate) fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .or_else(|| std::env::var_os(DB_PATH_FALLBACK_VAR).map(PathBuf::from))
            .unwrap_or_else(default_db_path)
    }

    /// Rejects values that still carry template placeholders.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending setting.
    pub(crate) fn validate(&self) -> Result<()> {
        // Only the file name is checked.
        let db_path = self.db_path();
        if let Some(name) = db_path.file_name() {
            check_placeholder("database file name", &name.to_string_lossy())?;
        }
        check_placeholder("table", &self.table)?;
        check_placeholder("API language", &self.api_lang)?;
        if self.api_timeout == 0 {
            bail!("API timeout must be positive");
        }
        Ok(())
    }

    /// Builds the HTTP client configuration.
    pub(crate) fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.api_timeout),
            max_retries: self.api_max_retries,
            lang: self.api_lang.clone(),
            ..ClientConfig::default()
        }
    }

    /// Builds the load configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the pagination bounds are invalid.
    pub(crate) fn load_config(&self, dry_run: bool) -> Result<LoadConfig> {
        let limits = PaginationLimits::new(self.api_page_size, Some(self.api_max_pages))
            .context("Invalid pagination settings")?;
        Ok(LoadConfig {
            table: self.table.clone(),
            limits,
            dry_run,
            ..LoadConfig::default()
        })
    }
}

/// Returns the default database path.
///
/// Uses the platform data directory (for example `~/.local/share/trowel/`
/// on Linux) and falls back to the working directory.
pub(crate) fn default_db_path() -> PathBuf {
    ProjectDirs::from("", "", "trowel").map_or_else(
        || PathBuf::from(DB_FILE_NAME),
        |dirs| dirs.data_dir().join(DB_FILE_NAME),
    )
}

fn check_placeholder(setting: &str, value: &str) -> Result<()> {
    let lowered = value.to_lowercase();
    if let Some(marker) = PLACEHOLDER_MARKERS.iter().find(|m| lowered.contains(*m)) {
        bail!("{setting} looks like a placeholder (contains '{marker}'): {value}");
    }
    Ok(())
}

/// Masks a secret, keeping only its rough length.
pub(crate) fn mask(value: &str) -> String {
    "*".repeat(value.chars().count().min(8))
}
