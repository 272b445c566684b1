//! Locale normalization for trowel.
//!
//! - [`NumeralCleaner`] - Persian digits to canonical ASCII numerals
//! - [`JalaliDate`] - Validated Solar Hijri dates with Gregorian conversion
//! - [`DateNormalizer`] - Heterogeneous source dates to templated Jalali strings
//! - [`DateStrategy`] - The per-source ordering of cleaning and normalization

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date;
mod jalali;
mod numerals;
mod strategy;

pub use date::{DateInput, DateNormalizer, DateTemplate, NULL_SENTINEL, to_jalali};
pub use jalali::{CalendarError, JalaliDate, MAX_YEAR, MIN_YEAR, days_in_month, is_leap_year};
pub use numerals::{NumeralCleaner, PERSIAN_DIGITS, ascii_digit, clean_numerals, transliterate};
pub use strategy::DateStrategy;
