use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

use crate::moment::{Moment, MILLIS_PER_DAY};
use crate::reminder::Reminder;

/// Where an occurrence came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OccurrenceKind {
    /// A one-off item stored directly on the timeline
    Plain,
    /// A member of a named series. `rule_id` is the recurrence rule that
    /// spawned it, or `None` for rule templates and occurrences that were
    /// moved into a series by hand.
    Series {
        series_name: String,
        rule_id: Option<Uuid>,
    },
    /// Materialized from a fixed calendar rule
    Fixed { rule_id: Uuid },
}

/// One concrete scheduled item.
///
/// Rule-spawned occurrences carry their rule's id, so expanding the same rule
/// twice yields occurrences with identical ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occurrence {
    id: Uuid,
    title: String,
    start: Moment,
    end: Moment,
    tags: Vec<String>,
    reminders: Vec<Reminder>,
    kind: OccurrenceKind,
}

impl Occurrence {
    /// A plain occurrence with a fresh id.
    pub fn new(title: impl Into<String>, start: Moment, end: Moment) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            start,
            end,
            tags: Vec::new(),
            reminders: Vec::new(),
            kind: OccurrenceKind::Plain,
        }
    }

    /// The template a recurrence rule copies from. Its id becomes the rule's id.
    pub fn series_template(
        series_name: impl Into<String>,
        title: impl Into<String>,
        start: Moment,
        end: Moment,
    ) -> Self {
        Self {
            kind: OccurrenceKind::Series {
                series_name: series_name.into(),
                rule_id: None,
            },
            ..Self::new(title, start, end)
        }
    }

    /// Copies title, tags and reminders from `template` onto a new span owned by `rule_id`.
    pub(crate) fn series_instance(template: &Occurrence, rule_id: Uuid, start: Moment, end: Moment) -> Self {
        Self {
            id: rule_id,
            title: template.title.clone(),
            start,
            end,
            tags: template.tags.clone(),
            reminders: template.reminders.clone(),
            kind: OccurrenceKind::Series {
                series_name: template.series_name().unwrap_or_default().to_string(),
                rule_id: Some(rule_id),
            },
        }
    }

    /// A zero-length occurrence at `at`.
    pub(crate) fn fixed_instance(rule_id: Uuid, name: &str, at: Moment) -> Self {
        Self {
            id: rule_id,
            title: name.to_string(),
            start: at,
            end: at,
            tags: Vec::new(),
            reminders: Vec::new(),
            kind: OccurrenceKind::Fixed { rule_id },
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn start(&self) -> Moment {
        self.start
    }

    pub fn set_start(&mut self, start: Moment) {
        self.start = start;
    }

    pub fn end(&self) -> Moment {
        self.end
    }

    pub fn set_end(&mut self, end: Moment) {
        self.end = end;
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn kind(&self) -> &OccurrenceKind {
        &self.kind
    }

    pub fn series_name(&self) -> Option<&str> {
        match &self.kind {
            OccurrenceKind::Series { series_name, .. } => Some(series_name),
            _ => None,
        }
    }

    /// The rule this occurrence was expanded from, if any.
    pub fn rule_id(&self) -> Option<Uuid> {
        match &self.kind {
            OccurrenceKind::Series { rule_id, .. } => *rule_id,
            OccurrenceKind::Fixed { rule_id } => Some(*rule_id),
            OccurrenceKind::Plain => None,
        }
    }

    /// Appends reminders in the order given.
    pub fn add_reminders(&mut self, reminders: impl IntoIterator<Item = Reminder>) {
        self.reminders.extend(reminders);
    }

    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
    }

    pub fn matches_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// True iff the start falls within the 24 hours following `day_start`, both ends inclusive.
    pub fn starts_within_day(&self, day_start: Moment) -> bool {
        let from = day_start.millis();
        let until = from + MILLIS_PER_DAY;
        (from..=until).contains(&self.start.millis())
    }

    /// Moves this occurrence into a series with no owning rule.
    ///
    /// The id, tags and reminders survive; the title is prefixed with the
    /// series name.
    pub fn detach_to_series(self, series_name: impl Into<String>) -> Occurrence {
        let series_name = series_name.into();
        Occurrence {
            title: format!("{}:{}", series_name, self.title),
            kind: OccurrenceKind::Series {
                series_name,
                rule_id: None,
            },
            ..self
        }
    }

    /// Orders by start moment only.
    pub fn cmp_start(&self, other: &Occurrence) -> Ordering {
        self.start.cmp(&other.start)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(series_name) = self.series_name() {
            write!(f, "{} - ", series_name)?;
        }
        write!(f, "{}: {} to {}", self.title, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> Moment {
        Moment::from_date_time_strings(date, time).unwrap()
    }

    fn lunch() -> Occurrence {
        Occurrence::new("Lunch", at("03/04/2024", "12:00:am"), at("03/04/2024", "01:00:pm"))
    }

    #[test]
    fn test_new_occurrence_is_plain_with_fresh_id() {
        let a = lunch();
        let b = lunch();
        assert_eq!(a.kind(), &OccurrenceKind::Plain);
        assert_ne!(a.id(), b.id());
        assert!(a.rule_id().is_none());
        assert!(a.tags().is_empty());
        assert!(a.reminders().is_empty());
    }

    #[test]
    fn test_tags_and_reminders_append() {
        let mut occurrence = lunch();
        occurrence.add_tags(["food", "social"]);
        occurrence.add_tags(Vec::<String>::new());
        assert!(occurrence.matches_tag("food"));
        assert!(!occurrence.matches_tag("Food"));

        let first = Reminder::new("soon", at("03/04/2024", "11:00:am"));
        let second = Reminder::new("earlier", at("03/04/2024", "10:00:am"));
        occurrence.add_reminders(vec![first.clone(), second.clone()]);
        assert_eq!(occurrence.reminders()[0].message, "soon");
        assert_eq!(occurrence.reminders()[1].message, "earlier");
    }

    #[test]
    fn test_detach_to_series_keeps_identity() {
        let mut occurrence = lunch();
        occurrence.add_tags(["food"]);
        occurrence.add_reminders([Reminder::new("go", at("03/04/2024", "11:45:am"))]);
        let id = occurrence.id();

        let detached = occurrence.detach_to_series("Team");
        assert_eq!(detached.id(), id);
        assert_eq!(detached.title(), "Team:Lunch");
        assert_eq!(detached.series_name(), Some("Team"));
        assert!(detached.rule_id().is_none());
        assert!(detached.matches_tag("food"));
        assert_eq!(detached.reminders().len(), 1);
    }

    #[test]
    fn test_series_instance_copies_template() {
        let mut template = Occurrence::series_template("Gym", "Workout", at("01/01/2024", "06:00:am"), at("01/01/2024", "07:00:am"));
        template.add_tags(["health"]);
        let rule_id = template.id();

        let instance = Occurrence::series_instance(&template, rule_id, at("02/01/2024", "06:00:am"), at("02/01/2024", "07:00:am"));
        assert_eq!(instance.id(), rule_id);
        assert_eq!(instance.title(), "Workout");
        assert_eq!(instance.rule_id(), Some(rule_id));
        assert_eq!(instance.series_name(), Some("Gym"));
        assert!(instance.matches_tag("health"));
    }

    #[test]
    fn test_starts_within_day_window() {
        let day_start = Moment::from_date_string("03/04/2024").unwrap();
        assert!(lunch().starts_within_day(day_start));

        let next_day = Occurrence::new("x", Moment::from_date_string("04/04/2024").unwrap(), Moment::from_date_string("04/04/2024").unwrap());
        // Exactly 24 hours later is still inside the inclusive window.
        assert!(next_day.starts_within_day(day_start));

        let before = Occurrence::new("y", at("02/04/2024", "11:00:pm"), at("03/04/2024", "01:00:pm"));
        assert!(!before.starts_within_day(day_start));
    }

    #[test]
    fn test_display_and_ordering() {
        let a = lunch();
        let b = Occurrence::new("Dinner", at("03/04/2024", "07:00:pm"), at("03/04/2024", "08:00:pm"));
        assert_eq!(a.cmp_start(&b), Ordering::Less);
        assert_eq!(a.to_string(), "Lunch: Wed 03/04/2024 12:00 PM to Wed 03/04/2024 01:00 PM");

        let template = Occurrence::series_template("Gym", "Workout", a.start(), a.end());
        assert!(template.to_string().starts_with("Gym - Workout: "));
    }
}
