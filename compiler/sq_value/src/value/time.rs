//! Dates and durations, both stored as milliseconds.
//!
//! Dates are UTC instants since the Unix epoch. Calendar conversion uses the
//! proleptic Gregorian day-count algorithms, so no time zone data is needed.

use std::fmt;

use super::format_number;

const MS_PER_SECOND: f64 = 1000.0;
const MS_PER_MINUTE: f64 = 60.0 * MS_PER_SECOND;
const MS_PER_HOUR: f64 = 60.0 * MS_PER_MINUTE;
const MS_PER_DAY: f64 = 24.0 * MS_PER_HOUR;
const MS_PER_YEAR: f64 = 365.25 * MS_PER_DAY;

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct SDuration {
    ms: f64,
}

impl SDuration {
    pub fn from_ms(ms: f64) -> Self {
        SDuration { ms }
    }

    pub fn from_seconds(s: f64) -> Self {
        SDuration::from_ms(s * MS_PER_SECOND)
    }

    pub fn from_minutes(m: f64) -> Self {
        SDuration::from_ms(m * MS_PER_MINUTE)
    }

    pub fn from_hours(h: f64) -> Self {
        SDuration::from_ms(h * MS_PER_HOUR)
    }

    pub fn from_days(d: f64) -> Self {
        SDuration::from_ms(d * MS_PER_DAY)
    }

    pub fn from_years(y: f64) -> Self {
        SDuration::from_ms(y * MS_PER_YEAR)
    }

    pub fn to_ms(self) -> f64 {
        self.ms
    }

    pub fn to_minutes(self) -> f64 {
        self.ms / MS_PER_MINUTE
    }

    pub fn to_hours(self) -> f64 {
        self.ms / MS_PER_HOUR
    }

    pub fn to_days(self) -> f64 {
        self.ms / MS_PER_DAY
    }

    pub fn to_years(self) -> f64 {
        self.ms / MS_PER_YEAR
    }

    #[must_use]
    pub fn add(self, other: SDuration) -> SDuration {
        SDuration::from_ms(self.ms + other.ms)
    }

    #[must_use]
    pub fn subtract(self, other: SDuration) -> SDuration {
        SDuration::from_ms(self.ms - other.ms)
    }

    #[must_use]
    pub fn scale(self, factor: f64) -> SDuration {
        SDuration::from_ms(self.ms * factor)
    }
}

/// Largest whole unit, two decimals: `3 days`, `1.5 hours`.
impl fmt::Display for SDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.ms.abs();
        let (amount, unit) = if magnitude >= MS_PER_YEAR {
            (self.to_years(), "years")
        } else if magnitude >= MS_PER_DAY {
            (self.to_days(), "days")
        } else if magnitude >= MS_PER_HOUR {
            (self.to_hours(), "hours")
        } else if magnitude >= MS_PER_MINUTE {
            (self.to_minutes(), "minutes")
        } else {
            (self.ms, "ms")
        };
        let rounded = (amount * 100.0).round() / 100.0;
        write!(f, "{} {unit}", format_number(rounded))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct SDate {
    ms: f64,
}

impl SDate {
    pub fn from_unix_ms(ms: f64) -> Self {
        SDate { ms }
    }

    pub fn from_unix_seconds(s: f64) -> Self {
        SDate::from_unix_ms(s * MS_PER_SECOND)
    }

    /// Midnight UTC of a calendar day. `None` for impossible dates.
    pub fn from_ymd(year: i64, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(SDate::from_unix_ms(
            days_from_civil(year, month, day) as f64 * MS_PER_DAY,
        ))
    }

    pub fn to_unix_ms(self) -> f64 {
        self.ms
    }

    pub fn to_unix_seconds(self) -> f64 {
        self.ms / MS_PER_SECOND
    }

    /// Calendar year, month and day (UTC).
    pub fn ymd(self) -> (i64, u32, u32) {
        civil_from_days((self.ms / MS_PER_DAY).floor() as i64)
    }

    #[must_use]
    pub fn add(self, duration: SDuration) -> SDate {
        SDate::from_unix_ms(self.ms + duration.to_ms())
    }

    #[must_use]
    pub fn subtract(self, duration: SDuration) -> SDate {
        SDate::from_unix_ms(self.ms - duration.to_ms())
    }

    pub fn since(self, earlier: SDate) -> SDuration {
        SDuration::from_ms(self.ms - earlier.ms)
    }
}

/// `YYYY-MM-DD`, with `HH:MM:SS` appended when not at midnight.
impl fmt::Display for SDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.ymd();
        write!(f, "{year:04}-{month:02}-{day:02}")?;
        let in_day = self.ms.rem_euclid(MS_PER_DAY);
        if in_day >= 1.0 {
            let seconds = (in_day / MS_PER_SECOND).floor() as u64;
            write!(
                f,
                " {:02}:{:02}:{:02}",
                seconds / 3600,
                (seconds / 60) % 60,
                seconds % 60
            )?;
        }
        Ok(())
    }
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = (if year >= 0 { year } else { year - 399 }) / 400;
    let year_of_era = year - era * 400;
    let month = i64::from(month);
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let day_of_era = z - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * shifted_month + 2) / 5 + 1) as u32;
    let month = (if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    }) as u32;
    let year = year_of_era + era * 400;
    (if month <= 2 { year + 1 } else { year }, month, day)
}
