use almanac_core::clock::VirtualClock;
use almanac_core::moment::Moment;
use almanac_core::reminder::Reminder;
use anyhow::Result;
use owo_colors::{OwoColorize, Style};

use crate::cli::TickCommand;
use crate::config::DriverConfig;
use crate::store::Store;

/// Advances the clock tick by tick, reporting every reminder that falls inside
/// a tick's window exactly once.
pub fn run_ticks(store: &mut Store, command: TickCommand, driver: DriverConfig, clock: &mut VirtualClock) -> Result<()> {
    let unit = command.unit.unwrap_or(driver.tick_unit);
    let amount = command.amount.unwrap_or(driver.tick_amount);
    let ticks = command.ticks.unwrap_or(driver.ticks);
    let alert_style = Style::new().yellow().bold();

    let mut fired = 0usize;
    for _ in 0..ticks {
        let before = clock.current();
        let now = clock.advance(unit, amount)?;
        for reminder in due_in_tick(store, before, now) {
            println!("{} {} - {}", "⏰".style(alert_style), reminder.fire_at, reminder.message);
            fired += 1;
        }
        store.reported_until = Some(now);
    }

    store.now = Some(clock.current());
    tracing::info!(ticks, fired, now = %clock.current(), "clock advanced");
    println!("{} {}", "Now:".bright_black(), clock.current());
    Ok(())
}

/// Reminders firing between `before` and `now`, both ends included, minus the
/// boundary the previous tick already reported.
fn due_in_tick(store: &Store, before: Moment, now: Moment) -> Vec<Reminder> {
    let (from, to) = if before <= now { (before, now) } else { (now, before) };
    let reported = store.reported_until;
    store
        .calendar
        .reminders_between(from, to)
        .into_iter()
        .filter(|r| !(reported == Some(before) && r.fire_at == before))
        .collect()
}
