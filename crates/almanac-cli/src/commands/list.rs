use almanac_core::clock::VirtualClock;
use almanac_core::models::Occurrence;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cli::{BetweenCommand, DayCommand, Phase, ShowCommand, StatusCommand};
use crate::parser::parse_moment;
use crate::store::Store;
use crate::util::resolve_id;
use crate::views::table::{display_occurrences, display_reminders, ViewOccurrence};

pub fn show_item(store: &Store, command: ShowCommand, clock: &VirtualClock) -> Result<()> {
    let id = resolve_id(&store.calendar, &command.id)?;
    let occurrence = store.calendar.timeline().lookup_by_id(id, clock)?;

    display_occurrences(&[ViewOccurrence::from(&occurrence)], clock.current());
    if !occurrence.reminders().is_empty() {
        println!("{}", "Reminders".bold());
        display_reminders(occurrence.reminders(), clock.current());
    }
    if let Some(memo) = store.calendar.memos().memo_for(id) {
        println!("{} {}", "Memo:".bright_black(), memo.description);
    }
    Ok(())
}

pub fn list_day(store: &Store, command: DayCommand, clock: &VirtualClock) -> Result<()> {
    let date = match command.date.as_deref() {
        Some(date) => parse_moment(date)?,
        None => clock.current(),
    };
    let events = store.calendar.timeline().events_on_date(date)?;

    println!("{}", date.format_with("%A %d %B %Y")?.bold());
    let views: Vec<ViewOccurrence> = events.iter().map(ViewOccurrence::from).collect();
    display_occurrences(&views, clock.current());
    Ok(())
}

pub fn list_between(store: &Store, command: BetweenCommand, clock: &VirtualClock) -> Result<()> {
    let from = parse_moment(&command.from)?;
    let to = parse_moment(&command.to)?;
    let mut events = store.calendar.timeline().events_between(from, to)?;
    if command.sorted {
        events.sort_by(Occurrence::cmp_start);
    }

    let views: Vec<ViewOccurrence> = events.iter().map(ViewOccurrence::from).collect();
    display_occurrences(&views, clock.current());
    Ok(())
}

pub fn list_status(store: &Store, command: StatusCommand, clock: &VirtualClock) -> Result<()> {
    let classification = store.calendar.timeline().classify(clock)?;

    let mut views = Vec::new();
    for (phase, bucket) in [
        (Phase::Past, &classification.past),
        (Phase::Ongoing, &classification.ongoing),
        (Phase::Upcoming, &classification.upcoming),
    ] {
        if command.phase.is_some_and(|wanted| wanted != phase) {
            continue;
        }
        views.extend(bucket.iter().map(|o| ViewOccurrence::with_phase(o, phase)));
    }

    println!("{} {}", "Now:".bright_black(), clock.current());
    display_occurrences(&views, clock.current());
    Ok(())
}
