//! Points in time.
//!
//! A [`Moment`] is an absolute instant with millisecond resolution. Calendar
//! components (year, month, weekday, time of day) are read in the single
//! implicit local zone; no offset is ever applied, so a moment's wall-clock
//! reading is the same on every host.

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Milliseconds of 9999-12-31 23:59:59.999, the last representable instant.
const FAR_FUTURE_MILLIS: i64 = 253_402_300_799_999;

pub const MILLIS_PER_MINUTE: i64 = 60 * 1000;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// The hour every date-only moment is pinned to. Date-keyed lookups start here.
const DAY_BOUNDARY_HOUR: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Moment {
    millis: i64,
}

impl Moment {
    /// Sentinel for "never ends".
    pub const FAR_FUTURE: Moment = Moment { millis: FAR_FUTURE_MILLIS };
    /// Sentinel for "unbounded past".
    pub const EPOCH_START: Moment = Moment { millis: 0 };

    pub fn far_future() -> Self {
        Self::FAR_FUTURE
    }

    pub fn epoch_start() -> Self {
        Self::EPOCH_START
    }

    /// The real current instant, read from the host's local wall clock.
    pub fn now() -> Self {
        let millis = Local::now().naive_local().and_utc().timestamp_millis();
        Self {
            millis: millis.clamp(0, FAR_FUTURE_MILLIS),
        }
    }

    pub fn from_millis(millis: i64) -> Result<Self, CoreError> {
        if !(0..=FAR_FUTURE_MILLIS).contains(&millis) {
            return Err(CoreError::DateOutOfRange(format!(
                "{millis} ms is outside the supported range"
            )));
        }
        Ok(Self { millis })
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    /// Overwrites the instant in place.
    pub fn set_millis(&mut self, millis: i64) -> Result<(), CoreError> {
        *self = Self::from_millis(millis)?;
        Ok(())
    }

    /// Builds a moment from calendar components. `month` is 1-based.
    pub fn from_ymd_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<Self, CoreError> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .ok_or_else(|| {
                CoreError::MalformedInput(format!(
                    "{day:02}/{month:02}/{year} {hour:02}:{minute:02} is not a calendar date"
                ))
            })?;
        Self::from_naive(naive)
    }

    /// Parses `dd/MM/yyyy`. The result sits at the 01:00 day boundary.
    pub fn from_date_string(date: &str) -> Result<Self, CoreError> {
        let day = parse_date(date)?;
        let naive = day
            .and_hms_opt(DAY_BOUNDARY_HOUR, 0, 0)
            .ok_or_else(|| CoreError::MalformedInput(date.to_string()))?;
        Self::from_naive(naive)
    }

    /// Parses `dd/MM/yyyy` together with a 12-hour `hh:mm:am` / `hh:mm:pm`.
    ///
    /// A `pm` suffix adds twelve hours to whatever hour was given, and the sum
    /// rolls over leniently: `12:15:pm` lands on 00:15 of the following day and
    /// `12:15:am` is 12:15 in the afternoon.
    pub fn from_date_time_strings(date: &str, time: &str) -> Result<Self, CoreError> {
        let day = parse_date(date)?;

        let tokens: Vec<&str> = time.trim().split(':').collect();
        if tokens.len() != 3 {
            return Err(CoreError::MalformedInput(format!(
                "expected hh:mm:(am|pm), got '{time}'"
            )));
        }
        let hour = parse_field::<i64>(tokens[0], time)?;
        let minute = parse_field::<i64>(tokens[1], time)?;
        if !(0..=12).contains(&hour) || !(0..60).contains(&minute) {
            return Err(CoreError::MalformedInput(format!("'{time}' is not a 12-hour time")));
        }
        let hour = match tokens[2].to_lowercase().as_str() {
            "am" => hour,
            "pm" => hour + 12,
            other => {
                return Err(CoreError::MalformedInput(format!(
                    "unknown meridiem '{other}' in '{time}'"
                )))
            }
        };

        let midnight = day.and_time(NaiveTime::default());
        Self::from_naive(midnight + Duration::hours(hour) + Duration::minutes(minute))
    }

    pub(crate) fn from_naive(naive: NaiveDateTime) -> Result<Self, CoreError> {
        Self::from_millis(naive.and_utc().timestamp_millis())
    }

    fn naive(&self) -> NaiveDateTime {
        // Every constructor keeps `millis` inside chrono's range.
        DateTime::from_timestamp_millis(self.millis)
            .unwrap_or_default()
            .naive_utc()
    }

    pub fn date(&self) -> NaiveDate {
        self.naive().date()
    }

    pub fn year(&self) -> i32 {
        self.naive().year()
    }

    /// 1-based month.
    pub fn month(&self) -> u32 {
        self.naive().month()
    }

    pub fn day(&self) -> u32 {
        self.naive().day()
    }

    pub fn weekday(&self) -> Weekday {
        self.naive().weekday()
    }

    /// 24-hour `(hour, minute)`.
    pub fn time_of_day(&self) -> (u32, u32) {
        let naive = self.naive();
        (naive.hour(), naive.minute())
    }

    /// `date` at the wall-clock `(hour, minute)`.
    pub fn on_date(date: NaiveDate, (hour, minute): (u32, u32)) -> Result<Self, CoreError> {
        let naive = date
            .and_hms_opt(hour, minute, 0)
            .ok_or_else(|| CoreError::MalformedInput(format!("{hour:02}:{minute:02}")))?;
        Self::from_naive(naive)
    }

    pub fn same_calendar_day(&self, other: &Moment) -> bool {
        self.date() == other.date()
    }

    /// True iff this moment falls in `month` (1-based) of `year`.
    pub fn in_month(&self, month: u32, year: i32) -> bool {
        let naive = self.naive();
        naive.month() == month && naive.year() == year
    }

    /// 01:00 on the same calendar day.
    pub fn start_of_day(&self) -> Moment {
        let naive = self.date().and_time(NaiveTime::default()) + Duration::hours(DAY_BOUNDARY_HOUR as i64);
        Self {
            millis: naive.and_utc().timestamp_millis(),
        }
    }

    pub fn next_day(&self) -> Result<Moment, CoreError> {
        if *self == Self::FAR_FUTURE {
            return Err(CoreError::DateOutOfRange("no day after the far-future sentinel".to_string()));
        }
        self.offset_millis(MILLIS_PER_DAY)
    }

    pub fn prev_day(&self) -> Result<Moment, CoreError> {
        if *self == Self::EPOCH_START {
            return Err(CoreError::DateOutOfRange("no day before the epoch sentinel".to_string()));
        }
        self.offset_millis(-MILLIS_PER_DAY)
    }

    /// Shifts by whole calendar months, clamping the day to the target month's length.
    pub fn offset_months(&self, n: i32) -> Result<Moment, CoreError> {
        let months = Months::new(n.unsigned_abs());
        let shifted = if n >= 0 {
            self.naive().checked_add_months(months)
        } else {
            self.naive().checked_sub_months(months)
        };
        shifted
            .ok_or_else(|| CoreError::DateOutOfRange(format!("cannot shift {self} by {n} months")))
            .and_then(Self::from_naive)
    }

    pub fn offset_weeks(&self, n: i32) -> Result<Moment, CoreError> {
        self.offset_millis(i64::from(n) * 7 * MILLIS_PER_DAY)
    }

    pub fn offset_millis(&self, delta: i64) -> Result<Moment, CoreError> {
        self.millis
            .checked_add(delta)
            .ok_or_else(|| CoreError::DateOutOfRange(format!("cannot shift {self} by {delta} ms")))
            .and_then(Self::from_millis)
    }

    /// Formats with a strftime pattern.
    pub fn format_with(&self, pattern: &str) -> Result<String, CoreError> {
        use std::fmt::Write;

        let mut out = String::new();
        write!(out, "{}", self.naive().format(pattern))
            .map_err(|_| CoreError::MalformedInput(format!("invalid format pattern '{pattern}'")))?;
        Ok(out)
    }

    /// `MMMM yyyy`, e.g. "March 2024".
    pub fn month_label(&self) -> String {
        self.naive().format("%B %Y").to_string()
    }
}

impl TryFrom<i64> for Moment {
    type Error = CoreError;

    fn try_from(millis: i64) -> Result<Self, Self::Error> {
        Self::from_millis(millis)
    }
}

impl From<Moment> for i64 {
    fn from(moment: Moment) -> Self {
        moment.millis
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.naive().format("%a %d/%m/%Y %I:%M %p"))
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, CoreError> {
    let tokens: Vec<&str> = date.trim().split('/').collect();
    if tokens.len() != 3 {
        return Err(CoreError::MalformedInput(format!("expected dd/MM/yyyy, got '{date}'")));
    }
    let day = parse_field::<u32>(tokens[0], date)?;
    let month = parse_field::<u32>(tokens[1], date)?;
    let year = parse_field::<i32>(tokens[2], date)?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CoreError::MalformedInput(format!("'{date}' is not a calendar date")))
}

fn parse_field<T: std::str::FromStr>(token: &str, whole: &str) -> Result<T, CoreError> {
    token
        .trim()
        .parse::<T>()
        .map_err(|_| CoreError::MalformedInput(format!("non-numeric field '{token}' in '{whole}'")))
}
