//! Date normalization into templated Jalali strings.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;
use trowel_types::{FieldOutcome, SkippedReason};

use crate::jalali::JalaliDate;
use crate::numerals::{ascii_digit, transliterate};

/// Sentinel some sources send instead of JSON null.
pub const NULL_SENTINEL: &str = "null";

/// A date value as it arrives from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    /// Raw text: an 8-digit Jalali code or a hyphenated Gregorian date.
    Text(&'a str),
    /// A Gregorian calendar date.
    Date(NaiveDate),
    /// A Gregorian timestamp; only the date part is used.
    DateTime(NaiveDateTime),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

/// Resolves a source date into a Jalali date.
///
/// - `None`, `""` and `"null"` are absent values.
/// - Eight digits (ASCII or Persian) are read as a Jalali `YYYYMMDD` code
///   with no calendar conversion.
/// - Text containing `-` is parsed as Gregorian `YYYY-MM-DD` and converted.
/// - Native dates are converted directly.
///
/// # Errors
///
/// Returns a [`SkippedReason`] for any other shape, or for a shape that
/// names a day the calendar does not have.
pub fn to_jalali(input: Option<DateInput<'_>>) -> FieldOutcome<JalaliDate> {
    let Some(input) = input else {
        return Ok(None);
    };

    let date = match input {
        DateInput::Text(text) if text.is_empty() || text == NULL_SENTINEL => return Ok(None),
        DateInput::Text(text) if is_compact_code(text) => {
            let digits = transliterate(text);
            let (year, month, day) = split_compact(&digits)
                .ok_or_else(|| SkippedReason::InvalidCalendarDate(text.to_string()))?;
            JalaliDate::new(year, month, day)
                .map_err(|_| SkippedReason::InvalidCalendarDate(text.to_string()))?
        }
        DateInput::Text(text) if text.contains('-') => {
            let gregorian = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_err(|_| SkippedReason::UnsupportedDateFormat(text.to_string()))?;
            JalaliDate::from_gregorian(gregorian)
                .map_err(|_| SkippedReason::InvalidCalendarDate(text.to_string()))?
        }
        DateInput::Text(text) => {
            return Err(SkippedReason::UnsupportedDateFormat(text.to_string()));
        }
        DateInput::Date(d) => JalaliDate::from_gregorian(d)
            .map_err(|e| SkippedReason::InvalidCalendarDate(e.to_string()))?,
        DateInput::DateTime(dt) => JalaliDate::from_gregorian(dt.date())
            .map_err(|e| SkippedReason::InvalidCalendarDate(e.to_string()))?,
    };

    Ok(Some(date))
}

/// True for exactly eight ASCII or Persian digits.
fn is_compact_code(text: &str) -> bool {
    text.chars().count() == 8 && text.chars().all(|c| ascii_digit(c).is_some())
}

/// Splits an 8-digit ASCII code into year, month and day.
pub(crate) fn split_compact(digits: &str) -> Option<(i32, u32, u32)> {
    if digits.len() != 8 || !digits.is_ascii() {
        return None;
    }
    Some((
        digits[0..4].parse().ok()?,
        digits[4..6].parse().ok()?,
        digits[6..8].parse().ok()?,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    Year,
    Month,
    Day,
    Literal(char),
}

/// Output template with `Y`, `m` and `d` placeholders.
///
/// Placeholders render zero-padded to 4, 2 and 2 digits; every other
/// character is copied as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTemplate {
    pieces: Vec<Piece>,
}

impl DateTemplate {
    /// Template for `YYYY-MM-DD`.
    pub const HYPHENATED: &'static str = "Y-m-d";

    /// Template for `YYYY/MM/DD`.
    pub const SLASHED: &'static str = "Y/m/d";

    /// Parses a template string.
    #[must_use]
    pub fn new(template: &str) -> Self {
        let pieces = template
            .chars()
            .map(|c| match c {
                'Y' => Piece::Year,
                'm' => Piece::Month,
                'd' => Piece::Day,
                other => Piece::Literal(other),
            })
            .collect();
        Self { pieces }
    }

    /// Renders a date.
    #[must_use]
    pub fn render(&self, date: &JalaliDate) -> String {
        let mut out = String::with_capacity(10);
        for piece in &self.pieces {
            match piece {
                Piece::Year => out.push_str(&format!("{:04}", date.year())),
                Piece::Month => out.push_str(&format!("{:02}", date.month())),
                Piece::Day => out.push_str(&format!("{:02}", date.day())),
                Piece::Literal(c) => out.push(*c),
            }
        }
        out
    }
}

impl Default for DateTemplate {
    fn default() -> Self {
        Self::new(Self::HYPHENATED)
    }
}

/// Converts heterogeneous source dates into templated Jalali strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateNormalizer {
    template: DateTemplate,
}

impl DateNormalizer {
    /// Creates a normalizer with the given output template.
    #[must_use]
    pub fn new(template: &str) -> Self {
        Self {
            template: DateTemplate::new(template),
        }
    }

    /// Returns the output template.
    #[must_use]
    pub const fn template(&self) -> &DateTemplate {
        &self.template
    }

    /// Normalizes `input`, keeping the reason when the value is dropped.
    ///
    /// # Errors
    ///
    /// See [`to_jalali`].
    pub fn try_normalize(&self, input: Option<DateInput<'_>>) -> FieldOutcome<String> {
        Ok(to_jalali(input)?.map(|d| self.template.render(&d)))
    }

    /// Normalizes `input`; unsupported values become `None`.
    #[must_use]
    pub fn normalize(&self, input: Option<DateInput<'_>>) -> Option<String> {
        self.try_normalize(input).unwrap_or_else(|reason| {
            debug!(%reason, "date left unnormalized");
            None
        })
    }
}
