use almanac_core::memo::Memo;
use almanac_core::models::{Occurrence, OccurrenceKind};
use almanac_core::moment::Moment;
use almanac_core::reminder::Reminder;
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use uuid::Uuid;

use crate::cli::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Event,
    Series,
    Fixed,
}

#[derive(Debug, Clone)]
pub struct ViewOccurrence {
    pub id: Uuid,
    pub title: String,
    pub source: Source,
    pub series: Option<String>,
    pub start: Moment,
    pub end: Moment,
    pub tags: Vec<String>,
    pub reminders: usize,
    pub phase: Option<Phase>,
}

impl ViewOccurrence {
    pub fn with_phase(occurrence: &Occurrence, phase: Phase) -> Self {
        Self {
            phase: Some(phase),
            ..Self::from(occurrence)
        }
    }
}

impl From<&Occurrence> for ViewOccurrence {
    fn from(occurrence: &Occurrence) -> Self {
        let source = match occurrence.kind() {
            OccurrenceKind::Plain => Source::Event,
            OccurrenceKind::Series { .. } => Source::Series,
            OccurrenceKind::Fixed { .. } => Source::Fixed,
        };
        Self {
            id: occurrence.id(),
            title: occurrence.title().to_string(),
            source,
            series: occurrence.series_name().map(str::to_string),
            start: occurrence.start(),
            end: occurrence.end(),
            tags: occurrence.tags().to_vec(),
            reminders: occurrence.reminders().len(),
            phase: None,
        }
    }
}

/// "in 3 days", "2 hours ago" relative to the simulated now.
fn relative(moment: Moment, now: Moment) -> String {
    HumanTime::from(chrono::Duration::milliseconds(moment.millis() - now.millis())).to_string()
}

pub fn display_occurrences(occurrences: &[ViewOccurrence], now: Moment) {
    if occurrences.is_empty() {
        println!("No events found.");
        return;
    }

    let mut table = Table::new();
    let mut header = vec!["ID", "Title", "Start", "End", "When", "Tags"];
    let show_phase = occurrences.iter().any(|o| o.phase.is_some());
    if show_phase {
        header.push("Phase");
    }
    table.set_header(header);

    for occurrence in occurrences {
        let mut row = Row::new();
        row.add_cell(Cell::new(occurrence.id.to_string()));

        let mut display_name = String::new();
        match occurrence.source {
            Source::Series => display_name.push_str("↻ "),
            Source::Fixed => display_name.push_str("★ "),
            Source::Event => {}
        }
        if let Some(series) = &occurrence.series {
            if series != &occurrence.title {
                display_name.push_str(series);
                display_name.push_str(": ");
            }
        }
        display_name.push_str(&occurrence.title);
        if occurrence.reminders > 0 {
            display_name.push_str(" ⏰");
        }
        let name_cell = match occurrence.source {
            Source::Event => Cell::new(display_name),
            Source::Series => Cell::new(display_name).fg(Color::Cyan),
            Source::Fixed => Cell::new(display_name).fg(Color::Magenta),
        };
        row.add_cell(name_cell);

        row.add_cell(Cell::new(occurrence.start.to_string()));
        row.add_cell(Cell::new(occurrence.end.to_string()));

        let when = relative(occurrence.start, now);
        let when_cell = if occurrence.start.same_calendar_day(&now) {
            Cell::new(when).fg(Color::Yellow)
        } else {
            Cell::new(when)
        };
        row.add_cell(when_cell);

        row.add_cell(Cell::new(if occurrence.tags.is_empty() {
            "None".to_string()
        } else {
            occurrence.tags.join(", ")
        }));

        if show_phase {
            let phase_cell = match occurrence.phase {
                Some(Phase::Past) => Cell::new("Past").fg(Color::DarkGrey),
                Some(Phase::Ongoing) => Cell::new("Ongoing").fg(Color::Green).add_attribute(Attribute::Bold),
                Some(Phase::Upcoming) => Cell::new("Upcoming").fg(Color::Yellow),
                None => Cell::new(""),
            };
            row.add_cell(phase_cell);
        }
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_reminders(reminders: &[Reminder], now: Moment) {
    if reminders.is_empty() {
        println!("No reminders found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Fires At", "When", "Message"]);
    for reminder in reminders {
        let mut row = Row::new();
        row.add_cell(Cell::new(reminder.fire_at.to_string()));
        let when_cell = if reminder.fire_at < now {
            Cell::new(relative(reminder.fire_at, now)).fg(Color::DarkGrey)
        } else {
            Cell::new(relative(reminder.fire_at, now))
        };
        row.add_cell(when_cell);
        row.add_cell(Cell::new(&reminder.message).add_attribute(Attribute::Bold));
        table.add_row(row);
    }

    println!("{table}");
}

/// `titles` maps each linked id to a display title, or `None` when the item is gone.
pub fn display_memos<F>(memos: &[Memo], titles: F)
where
    F: Fn(Uuid) -> Option<String>,
{
    if memos.is_empty() {
        println!("No memos found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Memo", "Linked Events"]);
    for memo in memos {
        let linked = if memo.occurrence_ids.is_empty() {
            "None".to_string()
        } else {
            memo.occurrence_ids
                .iter()
                .map(|id| titles(*id).unwrap_or_else(|| format!("{id} (missing)")))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut row = Row::new();
        row.add_cell(Cell::new(&memo.description));
        row.add_cell(Cell::new(linked));
        table.add_row(row);
    }

    println!("{table}");
}
