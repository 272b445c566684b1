//! Per-source date orderings.
//!
//! The API and board sources apply the same two steps in opposite order and
//! the difference is visible in edge cases, so each adapter names the
//! ordering it uses instead of sharing one code path.

use trowel_types::{FieldOutcome, SkippedReason};

use crate::date::{DateInput, DateNormalizer, DateTemplate, split_compact};
use crate::numerals::clean_numerals;

/// How a source adapter turns its raw date into a canonical string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// Normalize to a Jalali date, clean the digits, then split back into
    /// `YYYY-MM-DD`.
    NormalizeThenClean,
    /// Clean the raw text to digits, then split the 8 digits into
    /// `YYYY{sep}MM{sep}DD` without any calendar conversion.
    CleanThenSplit {
        /// Separator placed between year, month and day.
        separator: char,
    },
}

impl DateStrategy {
    /// Ordering used by the paginated API.
    pub const API: Self = Self::NormalizeThenClean;

    /// Ordering used by the rendered board page.
    pub const BOARD: Self = Self::CleanThenSplit { separator: '/' };

    /// Returns a short name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NormalizeThenClean => "normalize-then-clean",
            Self::CleanThenSplit { .. } => "clean-then-split",
        }
    }

    /// Applies the ordering to `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`SkippedReason`] when the value cannot be turned into an
    /// 8-digit date.
    pub fn apply(&self, input: Option<DateInput<'_>>) -> FieldOutcome<String> {
        match self {
            Self::NormalizeThenClean => {
                let Some(normalized) = DateNormalizer::default().try_normalize(input)? else {
                    return Ok(None);
                };
                let digits = clean_numerals(Some(&normalized))
                    .ok_or_else(|| SkippedReason::NotNumeric(normalized.clone()))?;
                split_digits(&digits, '-').map(Some)
            }
            Self::CleanThenSplit { separator } => {
                let text = match input {
                    None => return Ok(None),
                    Some(DateInput::Text(text)) => text,
                    Some(DateInput::Date(_) | DateInput::DateTime(_)) => {
                        return Err(SkippedReason::UnexpectedType("native date"));
                    }
                };
                let Some(digits) = clean_numerals(Some(text)) else {
                    return Ok(None);
                };
                split_digits(&digits, *separator).map(Some)
            }
        }
    }
}

impl std::fmt::Display for DateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn split_digits(digits: &str, separator: char) -> Result<String, SkippedReason> {
    let (year, month, day) = split_compact(digits)
        .ok_or_else(|| SkippedReason::UnsupportedDateFormat(digits.to_string()))?;
    Ok(format!("{year:04}{separator}{month:02}{separator}{day:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_api_ordering() {
        let s = DateStrategy::API;
        assert_eq!(s.apply(Some("14010101".into())), Ok(Some("1401-01-01".into())));
        assert_eq!(s.apply(Some("2022-08-16".into())), Ok(Some("1401-05-25".into())));
        assert_eq!(s.apply(Some("null".into())), Ok(None));
        assert_eq!(s.apply(None), Ok(None));
    }

    #[test]
    fn test_api_ordering_native_date() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        assert_eq!(
            DateStrategy::API.apply(Some(d.into())),
            Ok(Some("1403-01-01".into()))
        );
    }

    #[test]
    fn test_board_ordering() {
        let s = DateStrategy::BOARD;
        assert_eq!(
            s.apply(Some("۱۴۰۱/۰۵/۲۵".into())),
            Ok(Some("1401/05/25".into()))
        );
        assert_eq!(s.apply(Some("1401-05-25".into())), Ok(Some("1401/05/25".into())));
        assert_eq!(s.apply(Some("".into())), Ok(None));
        assert_eq!(s.apply(Some("تاریخ".into())), Ok(None));
    }

    #[test]
    fn test_board_ordering_does_not_validate_calendar() {
        // Splits digits only; the board already renders Jalali dates.
        assert_eq!(
            DateStrategy::BOARD.apply(Some("1402/12/30".into())),
            Ok(Some("1402/12/30".into()))
        );
    }

    #[test]
    fn test_board_ordering_rejects_wrong_length() {
        assert_eq!(
            DateStrategy::BOARD.apply(Some("1401/5/25".into())),
            Err(SkippedReason::UnsupportedDateFormat("1401525".into()))
        );
    }

    #[test]
    fn test_board_ordering_rejects_native_dates() {
        let d = NaiveDate::from_ymd_opt(2022, 3, 21).unwrap();
        assert!(matches!(
            DateStrategy::BOARD.apply(Some(d.into())),
            Err(SkippedReason::UnexpectedType(_))
        ));
    }

    #[test]
    fn test_orderings_differ() {
        // The API ordering rejects slashed text, the board ordering accepts it.
        let input = Some("1401/01/01".into());
        assert!(DateStrategy::API.apply(input).is_err());
        assert!(DateStrategy::BOARD.apply(input).is_ok());
    }
}
