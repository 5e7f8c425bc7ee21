use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alerts::ReminderBroker;
use crate::clock::VirtualClock;
use crate::error::CoreError;
use crate::memo::MemoBook;
use crate::moment::Moment;
use crate::reminder::Reminder;
use crate::timeline::{Removed, Timeline, TimelineConfig};

/// One named calendar: its timeline plus the memos that annotate it.
///
/// This is the unit that gets persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    name: String,
    timeline: Timeline,
    #[serde(default)]
    memos: MemoBook,
    #[serde(skip)]
    broker: ReminderBroker,
}

impl Calendar {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, TimelineConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: TimelineConfig) -> Self {
        Self {
            name: name.into(),
            timeline: Timeline::with_config(config),
            memos: MemoBook::new(),
            broker: ReminderBroker::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn memos(&self) -> &MemoBook {
        &self.memos
    }

    pub fn memos_mut(&mut self) -> &mut MemoBook {
        &mut self.memos
    }

    pub fn broker(&self) -> &ReminderBroker {
        &self.broker
    }

    /// Deletes `id` from the timeline and unlinks it from this calendar's memos.
    pub fn delete(&mut self, id: Uuid) -> Result<Removed, CoreError> {
        self.timeline.delete(id, &mut self.memos)
    }

    /// Reminders firing within the configured probe width after `moment`.
    pub fn reminders_at(&self, moment: Moment) -> Vec<Reminder> {
        let probe = self.timeline.config().reminder_probe_millis;
        let until = moment.offset_millis(probe).unwrap_or(Moment::FAR_FUTURE);
        self.reminders_between(moment, until)
    }

    /// Reminders on plain occurrences and rules that are due in `[start, end]`.
    pub fn reminders_between(&self, start: Moment, end: Moment) -> Vec<Reminder> {
        self.broker.reminders_in_window(
            self.timeline.occurrences(),
            self.timeline.rules(),
            start,
            end,
        )
    }

    /// Every reminder on anything happening within the fixed-rule window around now.
    pub fn all_reminders(&self, clock: &VirtualClock) -> Result<Vec<Reminder>, CoreError> {
        let now = clock.current();
        let window = self.timeline.config().fixed_rule_window_months as i32;
        let start = now.offset_months(-window).unwrap_or(Moment::EPOCH_START);
        let end = now.offset_months(window).unwrap_or(Moment::FAR_FUTURE);
        Ok(self
            .timeline
            .events_between(start, end)?
            .iter()
            .flat_map(|occurrence| occurrence.reminders().iter().cloned())
            .collect())
    }
}
