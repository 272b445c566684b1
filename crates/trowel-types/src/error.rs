//! Error types for trowel.

use thiserror::Error;

/// Result type alias for trowel operations.
pub type Result<T> = std::result::Result<T, TrowelError>;

/// Pipeline stage, used to report where a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Fetching and parsing source pages.
    Fetch,
    /// Loading existing keys and computing the delta.
    Detect,
    /// Appending new rows to the sink.
    Append,
}

impl Stage {
    /// Returns the stage as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Detect => "detect",
            Self::Append => "append",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors shared across the trowel crates.
#[derive(Error, Debug)]
pub enum TrowelError {
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}
