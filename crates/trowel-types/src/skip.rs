//! Typed outcomes for per-field coercion.

use serde::Serialize;
use thiserror::Error;

/// Why a field was coerced to null instead of carrying a value.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkippedReason {
    /// The text does not parse as a number.
    #[error("not numeric: {0:?}")]
    NotNumeric(String),

    /// The number does not fit the target integer type.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// The value matches none of the supported date shapes.
    #[error("unsupported date format: {0:?}")]
    UnsupportedDateFormat(String),

    /// The value has a supported shape but names no real calendar day.
    #[error("invalid calendar date: {0:?}")]
    InvalidCalendarDate(String),

    /// The value has a JSON type the field cannot hold.
    #[error("unexpected value type: {0}")]
    UnexpectedType(&'static str),
}

/// Result of coercing one field.
///
/// `Ok(None)` is a legitimately absent value (missing, JSON null, or the
/// `"null"` sentinel). `Err` is malformed input that was dropped.
pub type FieldOutcome<T> = Result<Option<T>, SkippedReason>;

/// A field that was dropped while building a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    /// Field name (e.g. "sell_price").
    pub field: String,
    /// Why it was dropped.
    pub reason: SkippedReason,
}

impl SkippedField {
    /// Creates a new skipped-field entry.
    #[must_use]
    pub fn new(field: impl Into<String>, reason: SkippedReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

impl std::fmt::Display for SkippedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}
