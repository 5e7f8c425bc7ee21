use almanac_core::clock::VirtualClock;
use anyhow::Result;

use crate::cli::AlertsCommand;
use crate::store::Store;
use crate::views::table::display_reminders;

pub fn list_alerts(store: &Store, command: AlertsCommand, clock: &VirtualClock) -> Result<()> {
    let reminders = if command.all {
        store.calendar.all_reminders(clock)?
    } else {
        store.calendar.reminders_at(clock.current())
    };
    display_reminders(&reminders, clock.current());
    Ok(())
}
