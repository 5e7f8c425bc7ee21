use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CoreError;
use crate::moment::{Moment, MILLIS_PER_DAY, MILLIS_PER_MINUTE};

/// A single time-stamped notification. Ordered by fire time only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub message: String,
    pub fire_at: Moment,
}

impl Reminder {
    pub fn new(message: impl Into<String>, fire_at: Moment) -> Self {
        Self {
            message: message.into(),
            fire_at,
        }
    }
}

impl PartialEq for Reminder {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at
    }
}

impl Eq for Reminder {}

impl PartialOrd for Reminder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reminder {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at.cmp(&other.fire_at)
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.fire_at, self.message)
    }
}

/// How often a [`ReminderRule`] fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Every 15 minutes
    QuarterHourly,
    /// Every 30 minutes
    HalfHourly,
    Hourly,
    Daily,
    Weekly,
}

impl Cadence {
    pub fn millis(self) -> i64 {
        match self {
            Cadence::QuarterHourly => 15 * MILLIS_PER_MINUTE,
            Cadence::HalfHourly => 30 * MILLIS_PER_MINUTE,
            Cadence::Hourly => 60 * MILLIS_PER_MINUTE,
            Cadence::Daily => MILLIS_PER_DAY,
            Cadence::Weekly => 7 * MILLIS_PER_DAY,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::QuarterHourly => write!(f, "15m"),
            Cadence::HalfHourly => write!(f, "30m"),
            Cadence::Hourly => write!(f, "60m"),
            Cadence::Daily => write!(f, "1d"),
            Cadence::Weekly => write!(f, "7d"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid reminder cadence: {0}")]
pub struct ParseCadenceError(String);

impl FromStr for Cadence {
    type Err = ParseCadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "15m" | "quarter-hourly" | "quarterhourly" => Ok(Cadence::QuarterHourly),
            "30m" | "half-hourly" | "halfhourly" => Ok(Cadence::HalfHourly),
            "60m" | "1h" | "hourly" => Ok(Cadence::Hourly),
            "1d" | "daily" => Ok(Cadence::Daily),
            "7d" | "weekly" => Ok(Cadence::Weekly),
            _ => Err(ParseCadenceError(s.to_string())),
        }
    }
}

/// A message repeated at a fixed cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRule {
    pub message: String,
    pub cadence: Cadence,
}

impl ReminderRule {
    pub fn new(message: impl Into<String>, cadence: Cadence) -> Self {
        Self {
            message: message.into(),
            cadence,
        }
    }

    /// One reminder per cadence step from `start` while the step is `<= end`.
    pub fn generate(&self, start: Moment, end: Moment) -> Result<Vec<Reminder>, CoreError> {
        let step = self.cadence.millis();
        let mut reminders = Vec::new();
        let mut current = start;

        while current <= end {
            reminders.push(Reminder::new(self.message.clone(), current));
            match current.offset_millis(step) {
                Ok(next) => current = next,
                // Stepping past the far-future sentinel means there is nothing left to emit.
                Err(CoreError::DateOutOfRange(_)) => break,
                Err(e) => return Err(e),
            }
        }

        Ok(reminders)
    }
}
