//! MS-DOS timestamp handling.
//!
//! This module provides the [`DosDateTime`] type for working with the
//! timestamps stored in zip entry headers. The container format records
//! modification times as a pair of 16-bit MS-DOS words:
//!
//! - date word: `year-1980` (7 bits), month (4 bits), day (5 bits)
//! - time word: hour (5 bits), minute (6 bits), `second/2` (5 bits)
//!
//! # Precision
//!
//! MS-DOS timestamps have 2-second granularity and cover the years
//! 1980 through 2107. When converting from Unix time, seconds are
//! truncated to the nearest even value and out-of-range dates are
//! rejected rather than clamped.
//!
//! # Time zone
//!
//! The stored words carry no zone information. This crate interprets them
//! as UTC in both directions, which keeps zip-then-unzip round trips exact
//! regardless of host zone configuration.
//!
//! # Example
//!
//! ```rust
//! use zipnest::DosDateTime;
//!
//! let ts = DosDateTime::from_unix_secs(1710505844).unwrap(); // 2024-03-15 12:30:44 UTC
//! assert_eq!(ts.year(), 2024);
//! assert_eq!(ts.month(), 3);
//! assert_eq!(ts.day(), 15);
//! assert_eq!(ts.as_unix_secs(), 1710505844);
//! ```

/// Unix seconds at 1980-01-01T00:00:00Z, the MS-DOS epoch.
const DOS_EPOCH_UNIX_SECS: i64 = 315_532_800;

/// Largest representable year (`1980 + 127`).
const MAX_YEAR: u16 = 2107;

const SECS_PER_DAY: i64 = 86_400;

/// A modification timestamp from a zip entry header.
///
/// Wraps validated calendar fields decoded from (or encodable to) the
/// MS-DOS date and time words, and converts to and from Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DosDateTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl DosDateTime {
    /// Creates a timestamp from calendar fields.
    ///
    /// Returns `None` when any field is outside what the MS-DOS words can
    /// encode: year 1980–2107, month 1–12, day 1–31, hour 0–23, minute
    /// 0–59, second 0–59. Odd seconds are kept here and truncated only by
    /// [`time_word`](Self::time_word). Day validity against the month
    /// length is checked too, so `1981-02-30` is rejected.
    pub fn from_fields(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Option<Self> {
        if !(1980..=MAX_YEAR).contains(&year)
            || !(1..=12).contains(&month)
            || day == 0
            || day > days_in_month(year, month)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Creates a timestamp from Unix seconds (since 1970-01-01T00:00:00Z).
    ///
    /// Returns `None` for instants before 1980 or after 2107, which the
    /// format cannot represent.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        if secs < DOS_EPOCH_UNIX_SECS {
            return None;
        }
        let days = secs.div_euclid(SECS_PER_DAY);
        let rem = secs.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        if year > i64::from(MAX_YEAR) {
            return None;
        }
        Self::from_fields(
            year as u16,
            month,
            day,
            (rem / 3600) as u8,
            ((rem % 3600) / 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        let days = days_from_civil(i64::from(self.year), self.month, self.day);
        days * SECS_PER_DAY
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// Encodes the date word: `year-1980` (7 bits), month (4), day (5).
    pub fn date_word(&self) -> u16 {
        ((self.year - 1980) << 9) | (u16::from(self.month) << 5) | u16::from(self.day)
    }

    /// Encodes the time word: hour (5 bits), minute (6), `second/2` (5).
    ///
    /// Odd seconds truncate to the even value below, the format's
    /// 2-second granularity.
    pub fn time_word(&self) -> u16 {
        (u16::from(self.hour) << 11) | (u16::from(self.minute) << 5) | (u16::from(self.second) >> 1)
    }

    /// The calendar year (1980–2107).
    pub fn year(&self) -> u16 {
        self.year
    }

    /// The calendar month (1–12).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The day of month (1–31).
    pub fn day(&self) -> u8 {
        self.day
    }

    /// The hour (0–23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// The minute (0–59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// The second (0–59; stored with 2-second granularity).
    pub fn second(&self) -> u8 {
        self.second
    }
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days since 1970-01-01 for a proleptic Gregorian civil date.
fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let mp = i64::from((month + 9) % 12);
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Civil date for a count of days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let m = ((mp + 2) % 12 + 1) as u8;
    (if m <= 2 { y + 1 } else { y }, m, d)
}
