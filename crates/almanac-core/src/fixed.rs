use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::Occurrence;
use crate::moment::Moment;

/// Which months a [`FixedCalendarRule`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthSpec {
    /// A single month, 1-based
    Only(u32),
    Every,
}

/// "Nth weekday of a month" with no creation moment, such as a statutory holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCalendarRule {
    id: Uuid,
    name: String,
    weekday: Weekday,
    /// 1..=5, covering days 1-7, 8-14, 15-21, 22-28 and 29-31
    week: u32,
    month: MonthSpec,
}

impl FixedCalendarRule {
    /// Creates a new FixedCalendarRule.
    ///
    /// # Arguments
    /// * `name` - Display name, also the title of every materialized occurrence
    /// * `day` - Weekday, 0 = Sunday through 6 = Saturday
    /// * `week` - Week of the month, 1 through 5
    /// * `month` - 1 through 12, or anything above 12 for every month
    pub fn new(name: impl Into<String>, day: u32, week: u32, month: u32) -> Result<Self, CoreError> {
        let name = name.into();
        let weekday = match day {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => return Err(CoreError::InvalidInput(format!("weekday must be 0-6, got {day}"))),
        };
        if !(1..=5).contains(&week) {
            return Err(CoreError::InvalidInput(format!("week of month must be 1-5, got {week}")));
        }
        let month_spec = match month {
            0 => return Err(CoreError::InvalidInput("month must be 1-12, or above 12 for every month".to_string())),
            1..=12 => MonthSpec::Only(month),
            _ => MonthSpec::Every,
        };

        let key = format!("{name}/{day}/{week}/{month}");
        Ok(Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()),
            name,
            weekday,
            week,
            month: month_spec,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn month(&self) -> MonthSpec {
        self.month
    }

    pub fn is_on_date(&self, date: Moment) -> bool {
        let week_of_month = (date.day() - 1) / 7 + 1;
        if week_of_month != self.week || date.weekday() != self.weekday {
            return false;
        }
        match self.month {
            MonthSpec::Every => true,
            MonthSpec::Only(month) => date.month() == month,
        }
    }

    /// A zero-length occurrence at `date` carrying this rule's id.
    pub fn to_occurrence(&self, date: Moment) -> Occurrence {
        Occurrence::fixed_instance(self.id, &self.name, date)
    }

    /// One occurrence per matching day in `[start, end]`, keeping `start`'s time of day.
    pub fn generate(&self, start: Moment, end: Moment) -> Vec<Occurrence> {
        let mut occurrences = Vec::new();
        let mut current = start;
        while current <= end {
            if self.is_on_date(current) {
                occurrences.push(self.to_occurrence(current));
            }
            match current.next_day() {
                Ok(next) => current = next,
                Err(_) => break,
            }
        }
        occurrences
    }
}

impl fmt::Display for FixedCalendarRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ordinal = match self.week {
            1 => "1st",
            2 => "2nd",
            3 => "3rd",
            4 => "4th",
            _ => "5th",
        };
        match self.month {
            MonthSpec::Every => write!(f, "{} on the {} {} of every month", self.name, ordinal, self.weekday),
            MonthSpec::Only(month) => write!(f, "{} on the {} {} of month {}", self.name, ordinal, self.weekday, month),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str) -> Moment {
        Moment::from_date_string(date).unwrap()
    }

    #[test]
    fn test_first_sunday_of_every_month() {
        let holiday = FixedCalendarRule::new("Holiday", 0, 1, 13).unwrap();
        assert_eq!(holiday.month(), MonthSpec::Every);
        assert_eq!(holiday.weekday(), Weekday::Sun);

        assert!(holiday.is_on_date(day("07/01/2024")));
        assert!(holiday.is_on_date(day("04/02/2024")));
        assert!(holiday.is_on_date(day("01/09/2024")));
        // Second Sunday, and a first-week Monday.
        assert!(!holiday.is_on_date(day("14/01/2024")));
        assert!(!holiday.is_on_date(day("01/01/2024")));
    }

    #[test]
    fn test_third_friday_every_month_over_a_year() {
        let rule = FixedCalendarRule::new("Review", 5, 3, 99).unwrap();
        let occurrences = rule.generate(day("01/01/2024"), day("31/12/2024"));
        assert_eq!(occurrences.len(), 12);
        for (index, occurrence) in occurrences.iter().enumerate() {
            assert_eq!(occurrence.start().month(), index as u32 + 1);
            assert_eq!(occurrence.start().weekday(), Weekday::Fri);
            assert!((15..=21).contains(&occurrence.start().day()));
        }
    }

    #[test]
    fn test_single_month_rule() {
        // Thanksgiving (Canada): 2nd Monday of October.
        let rule = FixedCalendarRule::new("Thanksgiving", 1, 2, 10).unwrap();
        assert!(rule.is_on_date(day("14/10/2024")));
        assert!(!rule.is_on_date(day("11/11/2024")));
        assert_eq!(rule.generate(day("01/01/2024"), day("31/12/2025")).len(), 2);
    }

    #[test]
    fn test_fifth_week_covers_month_tail() {
        let rule = FixedCalendarRule::new("Tail", 6, 5, 13).unwrap();
        // 30/03/2024 is a Saturday.
        assert!(rule.is_on_date(day("30/03/2024")));
        assert!(!rule.is_on_date(day("23/03/2024")));
    }

    #[test]
    fn test_generate_inclusive_and_ids_stable() {
        let rule = FixedCalendarRule::new("Holiday", 0, 1, 13).unwrap();
        let occurrences = rule.generate(day("07/01/2024"), day("04/02/2024"));
        assert_eq!(occurrences.len(), 2);
        assert!(occurrences.iter().all(|o| o.id() == rule.id()));
        assert_eq!(occurrences[0].start(), occurrences[0].end());
        assert_eq!(occurrences[0].title(), "Holiday");

        let same = FixedCalendarRule::new("Holiday", 0, 1, 13).unwrap();
        assert_eq!(same.id(), rule.id());
        let other = FixedCalendarRule::new("Holiday", 0, 2, 13).unwrap();
        assert_ne!(other.id(), rule.id());
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        assert!(matches!(FixedCalendarRule::new("x", 7, 1, 1), Err(CoreError::InvalidInput(_))));
        assert!(matches!(FixedCalendarRule::new("x", 0, 0, 1), Err(CoreError::InvalidInput(_))));
        assert!(matches!(FixedCalendarRule::new("x", 0, 6, 1), Err(CoreError::InvalidInput(_))));
        assert!(matches!(FixedCalendarRule::new("x", 0, 1, 0), Err(CoreError::InvalidInput(_))));
    }
}
