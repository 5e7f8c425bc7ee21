//! The owning collection of occurrences and rules for one calendar.
//!
//! Nothing derived is cached here: every classification or date query expands
//! the rules afresh against the clock it is handed, so results are only valid
//! for the instant they were computed at.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::VirtualClock;
use crate::error::CoreError;
use crate::fixed::FixedCalendarRule;
use crate::memo::DeletionHook;
use crate::models::Occurrence;
use crate::moment::{Moment, MILLIS_PER_DAY};
use crate::recurrence::{Frequency, RecurrenceRule, Termination};

/// Knobs for the windows a timeline expands rules over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// How far either side of "now" fixed rules are expanded when classifying
    pub fixed_rule_window_months: u32,
    /// Upcoming window for rules that never end
    pub unbounded_horizon_days: u32,
    /// Width of the window used when asking which reminders fire "at" a moment
    pub reminder_probe_millis: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            fixed_rule_window_months: 12,
            unbounded_horizon_days: 366,
            reminder_probe_millis: 500,
        }
    }
}

/// Past/ongoing/upcoming partitions, valid only for the instant they were computed at.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub past: Vec<Occurrence>,
    pub ongoing: Vec<Occurrence>,
    pub upcoming: Vec<Occurrence>,
}

/// What a [`Timeline::delete`] took out.
#[derive(Debug, Clone)]
pub enum Removed {
    Occurrence(Occurrence),
    Rule(RecurrenceRule),
    FixedRule(FixedCalendarRule),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    occurrences: Vec<Occurrence>,
    rules: Vec<RecurrenceRule>,
    fixed_rules: Vec<FixedCalendarRule>,
    #[serde(skip)]
    config: TimelineConfig,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TimelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TimelineConfig) {
        self.config = config;
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn rules(&self) -> &[RecurrenceRule] {
        &self.rules
    }

    pub fn fixed_rules(&self) -> &[FixedCalendarRule] {
        &self.fixed_rules
    }

    pub fn create_occurrence(&mut self, title: impl Into<String>, start: Moment, end: Moment) -> Uuid {
        self.add_occurrence(Occurrence::new(title, start, end))
    }

    /// Creates a new recurrence rule and its template.
    ///
    /// # Arguments
    /// * `series_name` - Name shared by every instance
    /// * `title` - Title of every instance
    /// * `start` - First instance's start; also when the rule begins
    /// * `end` - First instance's end, giving every instance its end time of day
    /// * `frequency` - Repetition tokens
    /// * `termination` - Count, end date, or never
    ///
    /// # Returns
    /// * `Result<Uuid, CoreError>` - The rule's id
    pub fn create_recurrence(
        &mut self,
        series_name: impl Into<String>,
        title: impl Into<String>,
        start: Moment,
        end: Moment,
        frequency: Vec<Frequency>,
        termination: Termination,
    ) -> Result<Uuid, CoreError> {
        let template = Occurrence::series_template(series_name, title, start, end);
        let rule = RecurrenceRule::new(start, frequency, template, termination)?;
        Ok(self.add_rule(rule))
    }

    pub fn create_fixed_rule(
        &mut self,
        name: impl Into<String>,
        day: u32,
        week: u32,
        month: u32,
    ) -> Result<Uuid, CoreError> {
        let rule = FixedCalendarRule::new(name, day, week, month)?;
        Ok(self.add_fixed_rule(rule))
    }

    pub fn add_occurrence(&mut self, occurrence: Occurrence) -> Uuid {
        let id = occurrence.id();
        tracing::debug!(occurrence = %id, title = occurrence.title(), "occurrence added");
        self.occurrences.push(occurrence);
        id
    }

    pub fn add_rule(&mut self, rule: RecurrenceRule) -> Uuid {
        let id = rule.id();
        tracing::debug!(rule = %id, series = rule.series_name(), "recurrence rule added");
        self.rules.push(rule);
        id
    }

    pub fn add_fixed_rule(&mut self, rule: FixedCalendarRule) -> Uuid {
        let id = rule.id();
        tracing::debug!(rule = %id, name = rule.name(), "fixed rule added");
        self.fixed_rules.push(rule);
        id
    }

    /// Finds whatever `id` names.
    ///
    /// # Behavior
    /// - Plain occurrences are searched first
    /// - A rule id yields the rule's template, not an expanded instance
    /// - A fixed rule id yields that rule materialized at the clock's current moment
    pub fn lookup_by_id(&self, id: Uuid, clock: &VirtualClock) -> Result<Occurrence, CoreError> {
        if let Some(occurrence) = self.occurrences.iter().find(|o| o.id() == id) {
            return Ok(occurrence.clone());
        }
        if let Some(rule) = self.rules.iter().find(|r| r.id() == id) {
            return Ok(rule.template().clone());
        }
        if let Some(rule) = self.fixed_rules.iter().find(|r| r.id() == id) {
            return Ok(rule.to_occurrence(clock.current()));
        }
        Err(CoreError::OccurrenceNotFound(id))
    }

    pub fn rule_by_id(&self, id: Uuid) -> Result<&RecurrenceRule, CoreError> {
        self.rules
            .iter()
            .find(|r| r.id() == id)
            .ok_or(CoreError::RuleNotFound(id))
    }

    pub fn rule_mut(&mut self, id: Uuid) -> Result<&mut RecurrenceRule, CoreError> {
        self.rules
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(CoreError::RuleNotFound(id))
    }

    pub fn occurrence_mut(&mut self, id: Uuid) -> Result<&mut Occurrence, CoreError> {
        self.occurrences
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or(CoreError::OccurrenceNotFound(id))
    }

    /// Removes the first item carrying `id`, searching plain occurrences, then
    /// recurrence rules, then fixed rules.
    ///
    /// `hook` hears about `id` whether or not anything was removed.
    pub fn delete<H>(&mut self, id: Uuid, hook: &mut H) -> Result<Removed, CoreError>
    where
        H: DeletionHook + ?Sized,
    {
        let removed = if let Some(index) = self.occurrences.iter().position(|o| o.id() == id) {
            Some(Removed::Occurrence(self.occurrences.remove(index)))
        } else if let Some(index) = self.rules.iter().position(|r| r.id() == id) {
            Some(Removed::Rule(self.rules.remove(index)))
        } else {
            self.fixed_rules
                .iter()
                .position(|r| r.id() == id)
                .map(|index| Removed::FixedRule(self.fixed_rules.remove(index)))
        };

        hook.notify_deleted(id);

        match removed {
            Some(removed) => {
                tracing::debug!(%id, "deleted from timeline");
                Ok(removed)
            }
            None => {
                tracing::warn!(%id, "delete found nothing to remove");
                Err(CoreError::OccurrenceNotFound(id))
            }
        }
    }

    /// Partitions everything on the timeline around the clock's current moment.
    ///
    /// # Behavior
    /// - Plain occurrences land in exactly one bucket: ended before now, spanning now, or starting after now
    /// - Recurrence rules contribute `generate(EPOCH_START, now)`, `generate(now, now)` and `generate(now, FAR_FUTURE)`
    /// - Rules that never end stop their upcoming window at the configured horizon
    /// - Fixed rules are only expanded within the configured month window either side of now
    pub fn classify(&self, clock: &VirtualClock) -> Result<Classification, CoreError> {
        let now = clock.current();
        let mut classification = Classification::default();

        for occurrence in &self.occurrences {
            let bucket = if occurrence.end() < now {
                &mut classification.past
            } else if occurrence.start() <= now {
                &mut classification.ongoing
            } else {
                &mut classification.upcoming
            };
            bucket.push(occurrence.clone());
        }

        let horizon = now
            .offset_millis(i64::from(self.config.unbounded_horizon_days) * MILLIS_PER_DAY)
            .unwrap_or(Moment::FAR_FUTURE);
        for rule in &self.rules {
            classification.past.extend(rule.generate(Moment::EPOCH_START, now)?);
            classification.ongoing.extend(rule.generate(now, now)?);
            let upcoming_end = match rule.termination() {
                Termination::Unbounded => {
                    tracing::debug!(rule = %rule.id(), until = %horizon, "clamping open-ended rule");
                    horizon
                }
                _ => Moment::FAR_FUTURE,
            };
            classification.upcoming.extend(rule.generate(now, upcoming_end)?);
        }

        let window = self.config.fixed_rule_window_months as i32;
        let window_start = now.offset_months(-window).unwrap_or(Moment::EPOCH_START);
        let window_end = now.offset_months(window).unwrap_or(Moment::FAR_FUTURE);
        for rule in &self.fixed_rules {
            classification.past.extend(rule.generate(window_start, now));
            if rule.is_on_date(now) {
                classification.ongoing.push(rule.to_occurrence(now));
            }
            classification.upcoming.extend(rule.generate(now, window_end));
        }

        Ok(classification)
    }

    pub fn past(&self, clock: &VirtualClock) -> Result<Vec<Occurrence>, CoreError> {
        Ok(self.classify(clock)?.past)
    }

    pub fn ongoing(&self, clock: &VirtualClock) -> Result<Vec<Occurrence>, CoreError> {
        Ok(self.classify(clock)?.ongoing)
    }

    pub fn upcoming(&self, clock: &VirtualClock) -> Result<Vec<Occurrence>, CoreError> {
        Ok(self.classify(clock)?.upcoming)
    }

    /// Everything starting on `date`'s calendar day, in ascending start order.
    ///
    /// Plain occurrences must start within 24 hours of the day's 01:00 boundary
    /// and on the same calendar day.
    pub fn events_on_date(&self, date: Moment) -> Result<Vec<Occurrence>, CoreError> {
        let day_start = date.start_of_day();
        let mut events = Vec::new();

        for occurrence in &self.occurrences {
            if occurrence.starts_within_day(day_start) && occurrence.start().same_calendar_day(&date) {
                insert_by_start(&mut events, occurrence.clone());
            }
        }
        for rule in &self.rules {
            for occurrence in rule.generate(day_start, day_start)? {
                insert_by_start(&mut events, occurrence);
            }
        }
        for rule in &self.fixed_rules {
            if rule.is_on_date(date) {
                insert_by_start(&mut events, rule.to_occurrence(date));
            }
        }

        Ok(events)
    }

    /// Rule expansions over `[start, end]`, then every plain occurrence, unsorted.
    pub fn events_between(&self, start: Moment, end: Moment) -> Result<Vec<Occurrence>, CoreError> {
        let mut events = Vec::new();
        for rule in &self.rules {
            events.extend(rule.generate(start, end)?);
        }
        for rule in &self.fixed_rules {
            events.extend(rule.generate(start, end));
        }
        events.extend(self.occurrences.iter().cloned());
        Ok(events)
    }
}

/// Inserts ahead of the first item that starts later, so ties keep arrival order.
fn insert_by_start(events: &mut Vec<Occurrence>, occurrence: Occurrence) {
    let index = events.partition_point(|existing| existing.start() <= occurrence.start());
    events.insert(index, occurrence);
}
