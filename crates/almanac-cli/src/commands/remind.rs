use almanac_core::error::CoreError;
use almanac_core::moment::Moment;
use anyhow::Result;
use owo_colors::{OwoColorize, Style};

use crate::cli::RemindCommand;
use crate::store::Store;
use crate::util::resolve_id;

pub fn add_reminder(store: &mut Store, command: RemindCommand) -> Result<()> {
    let id = resolve_id(&store.calendar, &command.id)?;
    let at = Moment::from_date_time_strings(&command.date, &command.time)?;
    let broker = *store.calendar.broker();
    let timeline = store.calendar.timeline_mut();

    let target = if timeline.occurrences().iter().any(|o| o.id() == id) {
        timeline.occurrence_mut(id)?
    } else {
        match timeline.rule_mut(id) {
            Ok(rule) => rule.template_mut(),
            Err(CoreError::RuleNotFound(_)) => return Err(CoreError::OccurrenceNotFound(id).into()),
            Err(e) => return Err(e.into()),
        }
    };

    let added = match command.every {
        Some(cadence) => broker.attach_series(target, command.message, cadence, at)?,
        None => {
            broker.attach(target, command.message, at);
            1
        }
    };

    let success_style = Style::new().green().bold();
    println!(
        "{} Added {} reminder(s) to '{}'",
        "✓".style(success_style),
        added,
        target.title().bright_white()
    );
    Ok(())
}
