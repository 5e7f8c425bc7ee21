use almanac_core::models::Occurrence;
use almanac_core::moment::Moment;
use almanac_core::recurrence::{RecurrenceRule, Termination};
use anyhow::Result;
use owo_colors::{OwoColorize, Style};

use crate::cli::{AddCommand, HolidayCommand, RecurCommand};
use crate::parser::{parse_frequencies, parse_span};
use crate::store::Store;

pub fn add_event(store: &mut Store, command: AddCommand) -> Result<()> {
    let (start, end) = parse_span(&command.span.date, &command.span.start, command.span.end.as_deref())?;
    let mut occurrence = Occurrence::new(command.title, start, end);
    occurrence.add_tags(command.tag);
    let id = store.calendar.timeline_mut().add_occurrence(occurrence);

    let success_style = Style::new().green().bold();
    println!("{} Created event: {}", "✓".style(success_style), id);
    println!("  {} {}", "Starts:".bright_black(), start);
    Ok(())
}

pub fn add_series(store: &mut Store, command: RecurCommand) -> Result<()> {
    let (start, end) = parse_span(&command.span.date, &command.span.start, command.span.end.as_deref())?;
    let frequency = parse_frequencies(&command.every)?;
    let termination = match (command.count, command.until.as_deref()) {
        (Some(count), _) => Termination::FiniteCount(count),
        (None, Some(until)) => Termination::UntilDate(Moment::from_date_string(until)?),
        (None, None) => Termination::Unbounded,
    };

    let mut template = Occurrence::series_template(command.series, command.title, start, end);
    template.add_tags(command.tag);
    let rule = RecurrenceRule::new(start, frequency, template, termination)?;
    let summary = rule
        .frequency()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let ends = match rule.termination() {
        Termination::Unbounded => "never".to_string(),
        _ => rule.end_moment().to_string(),
    };
    let id = store.calendar.timeline_mut().add_rule(rule);

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    println!("{} Created recurring series: {}", "✓".style(success_style), id);
    println!("  {} {}", "Repeats:".style(info_style), summary);
    println!("  {} {}", "Starts:".bright_black(), start);
    println!("  {} {}", "Ends:".bright_black(), ends);
    Ok(())
}

pub fn add_holiday(store: &mut Store, command: HolidayCommand) -> Result<()> {
    let id = store
        .calendar
        .timeline_mut()
        .create_fixed_rule(command.name, command.day, command.week, command.month)?;
    let rule = store
        .calendar
        .timeline()
        .fixed_rules()
        .iter()
        .find(|r| r.id() == id)
        .map(ToString::to_string)
        .unwrap_or_default();

    let success_style = Style::new().green().bold();
    println!("{} Created fixed rule: {}", "✓".style(success_style), id);
    println!("  {} {}", "Rule:".bright_black(), rule);
    Ok(())
}
