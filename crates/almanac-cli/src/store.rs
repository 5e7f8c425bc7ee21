use almanac_core::calendar::Calendar;
use almanac_core::clock::VirtualClock;
use almanac_core::moment::Moment;
use almanac_core::timeline::TimelineConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CliError;

/// What gets written to the calendar file: the calendar and the simulated clock.
#[derive(Debug, Serialize, Deserialize)]
pub struct Store {
    pub calendar: Calendar,
    /// Where the simulated clock stands; `None` until the first tick
    #[serde(default)]
    pub now: Option<Moment>,
    /// End of the last tick window whose reminders were already reported
    #[serde(default)]
    pub reported_until: Option<Moment>,
}

impl Store {
    pub fn new(calendar: Calendar, now: Option<Moment>) -> Self {
        Self {
            calendar,
            now,
            reported_until: None,
        }
    }

    pub fn load(path: &Path, config: TimelineConfig) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::MissingCalendar(path.to_path_buf()).into());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read calendar file '{}'", path.display()))?;
        let mut store: Store = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse calendar file '{}'", path.display()))?;
        store.calendar.timeline_mut().set_config(config);
        tracing::debug!(path = %path.display(), calendar = store.calendar.name(), "calendar loaded");
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("Failed to serialize calendar")?;
        fs::write(path, raw)
            .with_context(|| format!("Failed to write calendar file '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "calendar saved");
        Ok(())
    }

    /// The clock for this run: a pinned moment wins, then the stored one, then the system clock.
    pub fn clock(&self, pinned: Option<Moment>) -> VirtualClock {
        match pinned.or(self.now) {
            Some(now) => VirtualClock::new(now),
            None => VirtualClock::system(),
        }
    }
}
