//! Persian numeral cleaning.

/// Persian digit glyphs, indexed by value.
pub const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Returns the ASCII digit for an ASCII or Persian digit glyph.
#[inline]
#[must_use]
pub fn ascii_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }
    PERSIAN_DIGITS
        .iter()
        .position(|&p| p == c)
        .and_then(|i| char::from_digit(i as u32, 10))
}

/// Replaces every Persian digit with its ASCII equivalent, leaving other
/// characters untouched.
#[must_use]
pub fn transliterate(text: &str) -> String {
    text.chars().map(|c| ascii_digit(c).unwrap_or(c)).collect()
}

/// Turns scraped text into a canonical ASCII numeric string.
///
/// Persian digits are transliterated, then every character that is not an
/// ASCII digit is dropped. The price variant keeps the first decimal point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumeralCleaner {
    keep_decimal_point: bool,
}

impl NumeralCleaner {
    /// Creates a cleaner that keeps digits only.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keep_decimal_point: false,
        }
    }

    /// Creates a cleaner for fractional prices that keeps one decimal point.
    #[must_use]
    pub const fn with_decimal_point() -> Self {
        Self {
            keep_decimal_point: true,
        }
    }

    /// Cleans `text`.
    ///
    /// Returns `None` for missing or empty input and when no digit survives.
    #[must_use]
    pub fn clean(&self, text: Option<&str>) -> Option<String> {
        let text = text.filter(|t| !t.is_empty())?;
        let mut seen_point = false;
        let mut out = String::with_capacity(text.len());

        for c in text.chars() {
            if let Some(d) = ascii_digit(c) {
                out.push(d);
            } else if c == '.' && self.keep_decimal_point && !seen_point {
                seen_point = true;
                out.push('.');
            }
        }

        out.chars().any(|c| c.is_ascii_digit()).then_some(out)
    }
}

/// Cleans `text` with the digits-only cleaner.
#[must_use]
pub fn clean_numerals(text: Option<&str>) -> Option<String> {
    NumeralCleaner::new().clean(text)
}
