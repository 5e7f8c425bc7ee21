//! The simulated "now".
//!
//! There is no global clock. The application owns one [`VirtualClock`] and
//! hands a reference to every query that classifies against the present, so a
//! tick moves every timeline at once and tests can pin time wherever they like.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CoreError;
use crate::moment::{Moment, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
}

impl TickUnit {
    pub fn millis(self) -> i64 {
        match self {
            TickUnit::Second => 1000,
            TickUnit::Minute => MILLIS_PER_MINUTE,
            TickUnit::Hour => MILLIS_PER_HOUR,
            TickUnit::Day => MILLIS_PER_DAY,
            TickUnit::Week => 7 * MILLIS_PER_DAY,
        }
    }
}

impl fmt::Display for TickUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickUnit::Second => write!(f, "sec"),
            TickUnit::Minute => write!(f, "min"),
            TickUnit::Hour => write!(f, "hour"),
            TickUnit::Day => write!(f, "day"),
            TickUnit::Week => write!(f, "week"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid tick unit: {0}")]
pub struct ParseTickUnitError(String);

impl FromStr for TickUnit {
    type Err = ParseTickUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sec" | "second" | "seconds" => Ok(TickUnit::Second),
            "min" | "minute" | "minutes" => Ok(TickUnit::Minute),
            "hour" | "hours" => Ok(TickUnit::Hour),
            "day" | "days" => Ok(TickUnit::Day),
            "week" | "weeks" => Ok(TickUnit::Week),
            _ => Err(ParseTickUnitError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualClock {
    current: Moment,
}

impl VirtualClock {
    pub fn new(start: Moment) -> Self {
        Self { current: start }
    }

    /// A clock starting at the host's real current instant.
    pub fn system() -> Self {
        Self::new(Moment::now())
    }

    pub fn current(&self) -> Moment {
        self.current
    }

    pub fn set(&mut self, moment: Moment) {
        self.current = moment;
    }

    /// Moves the clock by `amount` units and returns the new instant.
    ///
    /// On failure the clock is left where it was.
    pub fn advance(&mut self, unit: TickUnit, amount: i64) -> Result<Moment, CoreError> {
        let delta = unit.millis().checked_mul(amount).ok_or_else(|| {
            CoreError::DateOutOfRange(format!("advancing by {amount} {unit} overflows"))
        })?;
        self.current = self.current.offset_millis(delta)?;
        tracing::debug!(%unit, amount, now = %self.current, "virtual clock advanced");
        Ok(self.current)
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::system()
    }
}
