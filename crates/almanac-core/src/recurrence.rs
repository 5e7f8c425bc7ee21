use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::Occurrence;
use crate::moment::{Moment, MILLIS_PER_DAY};

/// One repetition token. A rule carries either exactly one of
/// `Daily`/`Monthly`/`Yearly`, or one or more `Weekly` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Monthly,
    Yearly,
    Weekly(Weekday),
}

impl Frequency {
    pub fn is_weekly(&self) -> bool {
        matches!(self, Frequency::Weekly(_))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Yearly => write!(f, "yearly"),
            Frequency::Weekly(day) => write!(f, "weekly on {}", day),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid frequency: {0}")]
pub struct ParseFrequencyError(String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    /// Accepts `daily`, `monthly`, `yearly`, or a weekday (`mon`, `tuesday`, ...)
    /// meaning "weekly on that day".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => other
                .parse::<Weekday>()
                .map(Frequency::Weekly)
                .map_err(|_| ParseFrequencyError(s.to_string())),
        }
    }
}

/// When a rule stops producing occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Ends after this many periods of the first frequency token
    FiniteCount(u32),
    /// Ends at this moment
    UntilDate(Moment),
    /// Never ends; only ever expands as far as it is asked to
    Unbounded,
}

/// A template occurrence plus a repetition pattern and a termination policy.
///
/// The rule's id is its template's id, and every occurrence it expands into
/// carries that same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Source of title, tags, reminders and time of day
    template: Occurrence,
    frequency: Vec<Frequency>,
    termination: Termination,
    created_on: Moment,
    /// Last moment the rule may generate on (exclusive of that day).
    /// `FAR_FUTURE` for unbounded rules.
    end: Moment,
}

impl RecurrenceRule {
    /// Creates a new RecurrenceRule.
    ///
    /// # Arguments
    /// * `created_on` - First moment the rule may generate on
    /// * `frequency` - Repetition tokens
    /// * `template` - Occurrence copied into every expanded instance
    /// * `termination` - When the rule stops
    ///
    /// # Behavior
    /// - Reject an empty token list and a weekly/non-weekly mix
    /// - Count-terminated rules compute their end moment once, here
    pub fn new(
        created_on: Moment,
        frequency: Vec<Frequency>,
        template: Occurrence,
        termination: Termination,
    ) -> Result<Self, CoreError> {
        validate_frequency(&frequency)?;
        let mut rule = Self {
            template,
            frequency,
            termination,
            created_on,
            end: Moment::FAR_FUTURE,
        };
        rule.end = match termination {
            Termination::FiniteCount(count) => rule.end_after(count)?,
            Termination::UntilDate(until) => until,
            Termination::Unbounded => Moment::FAR_FUTURE,
        };
        Ok(rule)
    }

    pub fn id(&self) -> Uuid {
        self.template.id()
    }

    pub fn template(&self) -> &Occurrence {
        &self.template
    }

    /// Edits here show up in every instance expanded afterwards.
    pub fn template_mut(&mut self) -> &mut Occurrence {
        &mut self.template
    }

    pub fn series_name(&self) -> &str {
        self.template.series_name().unwrap_or_default()
    }

    pub fn frequency(&self) -> &[Frequency] {
        &self.frequency
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn created_on(&self) -> Moment {
        self.created_on
    }

    /// The moment past which nothing is generated.
    pub fn end_moment(&self) -> Moment {
        self.end
    }

    pub fn set_frequency(&mut self, frequency: Vec<Frequency>) -> Result<(), CoreError> {
        validate_frequency(&frequency)?;
        self.frequency = frequency;
        Ok(())
    }

    /// Switches to a count-based end so the `count`-th instance is the last one.
    pub fn set_end_after_count(&mut self, count: u32) -> Result<(), CoreError> {
        self.end = self.end_after(count)?;
        self.termination = Termination::FiniteCount(count);
        Ok(())
    }

    pub fn set_end_date(&mut self, until: Moment) {
        self.termination = Termination::UntilDate(until);
        self.end = until;
    }

    pub fn set_unbounded(&mut self) {
        self.termination = Termination::Unbounded;
        self.end = Moment::FAR_FUTURE;
    }

    /// Generates the occurrences whose calendar day lies in `[start, end]`.
    ///
    /// # Arguments
    /// * `start` - First day of the query, inclusive
    /// * `end` - Last day of the query, inclusive
    ///
    /// # Returns
    /// * `Result<Vec<Occurrence>, CoreError>` - Instances in ascending order
    ///
    /// # Behavior
    /// - Push `end` one day out so the final day is walked (unless it is the far-future sentinel)
    /// - An unbounded rule ends wherever the query ends
    /// - Clamp the window to `[created_on, end_moment]`, returning nothing when they do not overlap
    /// - Walk day by day up to, but excluding, the clamped end's day
    /// - Each matching day becomes an instance at the template's time of day
    pub fn generate(&self, start: Moment, end: Moment) -> Result<Vec<Occurrence>, CoreError> {
        let mut start = start;
        let mut end = if end < Moment::FAR_FUTURE {
            end.next_day().unwrap_or(Moment::FAR_FUTURE)
        } else {
            end
        };

        let rule_end = match self.termination {
            Termination::Unbounded => end,
            _ => self.end,
        };

        if start < self.created_on {
            if end < self.created_on {
                return Ok(Vec::new());
            }
            start = self.created_on;
        }

        if end > rule_end {
            if start > rule_end {
                return Ok(Vec::new());
            }
            end = rule_end;
        }

        let start_time = self.template.start().time_of_day();
        let end_time = self.template.end().time_of_day();
        let last_day = end.date();

        let mut occurrences = Vec::new();
        for day in start.date().iter_days().take_while(|day| *day < last_day) {
            if self.falls_on(day) {
                occurrences.push(Occurrence::series_instance(
                    &self.template,
                    self.id(),
                    Moment::on_date(day, start_time)?,
                    Moment::on_date(day, end_time)?,
                ));
            }
        }

        tracing::debug!(
            rule = %self.id(),
            from = %start,
            until = %end,
            count = occurrences.len(),
            "expanded recurrence rule"
        );
        Ok(occurrences)
    }

    fn falls_on(&self, day: NaiveDate) -> bool {
        let anchor = self.template.start();
        match self.frequency.first() {
            Some(Frequency::Daily) => true,
            Some(Frequency::Monthly) => day.day() == anchor.day(),
            Some(Frequency::Yearly) => day.day() == anchor.day() && day.month() == anchor.month(),
            Some(Frequency::Weekly(_)) => self
                .frequency
                .iter()
                .any(|f| matches!(f, Frequency::Weekly(weekday) if *weekday == day.weekday())),
            None => false,
        }
    }

    /// The end moment after `count` periods of the first frequency token.
    fn end_after(&self, count: u32) -> Result<Moment, CoreError> {
        let count = i64::from(count);
        let days = match self.frequency.first() {
            Some(Frequency::Daily) => count,
            Some(Frequency::Monthly) => {
                let mut year = self.created_on.year();
                let mut month = self.created_on.month();
                let mut days = 0;
                for _ in 0..count {
                    days += days_in_month(year, month);
                    if month == 12 {
                        year += 1;
                        month = 1;
                    } else {
                        month += 1;
                    }
                }
                days
            }
            Some(Frequency::Yearly) => {
                // A year from a day before March spans that year's Feb 29, otherwise the next one.
                let first = self.created_on.year() + i32::from(self.created_on.month() > 2);
                (0..count)
                    .map(|offset| {
                        let year = first.saturating_add(i32::try_from(offset).unwrap_or(i32::MAX));
                        if is_leap_year(year) {
                            366
                        } else {
                            365
                        }
                    })
                    .sum()
            }
            Some(Frequency::Weekly(_)) | None => count * 7,
        };

        days.checked_mul(MILLIS_PER_DAY)
            .ok_or_else(|| CoreError::DateOutOfRange(format!("{count} periods overflow")))
            .and_then(|delta| self.created_on.offset_millis(delta))
    }
}

fn validate_frequency(frequency: &[Frequency]) -> Result<(), CoreError> {
    match frequency {
        [] => Err(CoreError::InvalidInput("a recurrence needs at least one frequency".to_string())),
        [_] => Ok(()),
        many if many.iter().all(Frequency::is_weekly) => Ok(()),
        _ => Err(CoreError::InvalidInput(
            "only weekly frequencies can be combined".to_string(),
        )),
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}
