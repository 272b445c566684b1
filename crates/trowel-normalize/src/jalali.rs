//! Jalali (Solar Hijri) calendar arithmetic.
//!
//! Leap years follow the break table of the 33-year-cycle algorithm used by
//! the common Jalaali libraries. Day arithmetic goes through chrono's
//! days-from-CE counter so the Gregorian side is never hand-rolled.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Years at which the leap pattern of the 33-year cycle shifts.
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// First supported Jalali year.
pub const MIN_YEAR: i32 = BREAKS[0];

/// Last supported Jalali year.
pub const MAX_YEAR: i32 = BREAKS[BREAKS.len() - 1] - 1;

/// Errors produced by calendar construction and conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Year outside the supported range.
    #[error("Jalali year {0} outside {MIN_YEAR}..={MAX_YEAR}")]
    YearOutOfRange(i32),

    /// Month outside 1..=12.
    #[error("Invalid Jalali month: {0}")]
    InvalidMonth(u32),

    /// Day outside the month's length.
    #[error("Invalid Jalali day: {year}-{month:02}-{day:02}")]
    InvalidDay {
        /// The year.
        year: i32,
        /// The month.
        month: u32,
        /// The offending day.
        day: u32,
    },

    /// The Gregorian side of a conversion is outside chrono's range.
    #[error("Gregorian date out of range")]
    GregorianOutOfRange,
}

/// Per-year facts derived from the break table.
struct YearInfo {
    /// Years since the last leap year (0 means this year is leap).
    leap: i32,
    /// Gregorian year in which this Jalali year starts.
    gy: i32,
    /// March day of 1 Farvardin.
    march: u32,
}

fn year_info(jy: i32) -> Result<YearInfo, CalendarError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&jy) {
        return Err(CalendarError::YearOutOfRange(jy));
    }

    let gy = jy + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Ok(YearInfo {
        leap,
        gy,
        march: march as u32,
    })
}

/// Days from CE of 1 Farvardin for the given year info.
fn year_start(info: &YearInfo) -> Result<i32, CalendarError> {
    NaiveDate::from_ymd_opt(info.gy, 3, info.march)
        .map(|d| d.num_days_from_ce())
        .ok_or(CalendarError::GregorianOutOfRange)
}

/// Returns true if `year` is a Jalali leap year.
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    year_info(year).is_ok_and(|info| info.leap == 0)
}

/// Returns the number of days in a Jalali month, or `None` for an invalid
/// year or month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    match month {
        1..=6 => Some(31),
        7..=11 => Some(30),
        12 => year_info(year)
            .ok()
            .map(|info| if info.leap == 0 { 30 } else { 29 }),
        _ => None,
    }
}

/// A validated Jalali calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JalaliDate {
    year: i32,
    month: u32,
    day: u32,
}

impl JalaliDate {
    /// Creates a date, validating it against the calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is unsupported or the month/day do not exist.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        year_info(year)?;
        let len = days_in_month(year, month).ok_or(CalendarError::InvalidMonth(month))?;
        if day == 0 || day > len {
            return Err(CalendarError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Converts a Gregorian date.
    ///
    /// # Errors
    ///
    /// Returns an error if the date falls outside the supported Jalali years.
    pub fn from_gregorian(date: NaiveDate) -> Result<Self, CalendarError> {
        let days = date.num_days_from_ce();
        let gy = date.year();
        let mut jy = gy - 621;
        let info = year_info(jy)?;
        let mut k = days - year_start(&info)?;

        if k >= 0 {
            if k <= 185 {
                return Self::new(jy, 1 + (k / 31) as u32, (k % 31) as u32 + 1);
            }
            k -= 186;
        } else {
            jy -= 1;
            k += 179;
            if info.leap == 1 {
                k += 1;
            }
        }

        Self::new(jy, 7 + (k / 30) as u32, (k % 30) as u32 + 1)
    }

    /// Converts to the Gregorian calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is outside chrono's range.
    pub fn to_gregorian(&self) -> Result<NaiveDate, CalendarError> {
        let info = year_info(self.year)?;
        let month = self.month as i32;
        let offset = (month - 1) * 31 - (month / 7) * (month - 7) + self.day as i32 - 1;
        NaiveDate::from_num_days_from_ce_opt(year_start(&info)? + offset)
            .ok_or(CalendarError::GregorianOutOfRange)
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Returns the day of month.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }
}

impl std::fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greg(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nowruz_1401() {
        let j = JalaliDate::from_gregorian(greg(2022, 3, 21)).unwrap();
        assert_eq!((j.year(), j.month(), j.day()), (1401, 1, 1));
    }

    #[test]
    fn test_known_conversions() {
        let cases = [
            (greg(2021, 3, 21), (1400, 1, 1)),
            (greg(2021, 3, 20), (1399, 12, 30)),
            (greg(2022, 8, 16), (1401, 5, 25)),
            (greg(2022, 9, 23), (1401, 7, 1)),
            (greg(2024, 3, 19), (1402, 12, 29)),
            (greg(2024, 3, 20), (1403, 1, 1)),
            (greg(2025, 3, 20), (1403, 12, 30)),
            (greg(2025, 3, 21), (1404, 1, 1)),
        ];
        for (g, (y, m, d)) in cases {
            let j = JalaliDate::from_gregorian(g).unwrap();
            assert_eq!((j.year(), j.month(), j.day()), (y, m, d), "from {g}");
            assert_eq!(j.to_gregorian().unwrap(), g, "back to {g}");
        }
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(1399));
        assert!(is_leap_year(1403));
        assert!(!is_leap_year(1400));
        assert!(!is_leap_year(1402));
        assert_eq!(days_in_month(1403, 12), Some(30));
        assert_eq!(days_in_month(1402, 12), Some(29));
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(
            JalaliDate::new(1401, 13, 1),
            Err(CalendarError::InvalidMonth(13))
        );
        assert!(matches!(
            JalaliDate::new(1401, 7, 31),
            Err(CalendarError::InvalidDay { .. })
        ));
        assert!(JalaliDate::new(1402, 12, 30).is_err());
        assert!(JalaliDate::new(1401, 1, 0).is_err());
        assert_eq!(
            JalaliDate::new(4000, 1, 1),
            Err(CalendarError::YearOutOfRange(4000))
        );
    }

    #[test]
    fn test_round_trip_full_year() {
        let mut g = greg(2022, 3, 21);
        for _ in 0..800 {
            let j = JalaliDate::from_gregorian(g).unwrap();
            assert_eq!(j.to_gregorian().unwrap(), g);
            g = g.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_display_zero_padded() {
        let j = JalaliDate::new(1401, 1, 5).unwrap();
        assert_eq!(j.to_string(), "1401-01-05");
    }
}
