use almanac_core::timeline::Removed;
use anyhow::Result;
use owo_colors::{OwoColorize, Style};

use crate::cli::DeleteCommand;
use crate::store::Store;
use crate::util::resolve_id;

pub fn delete_item(store: &mut Store, command: DeleteCommand) -> Result<()> {
    let id = resolve_id(&store.calendar, &command.id)?;
    let removed = store.calendar.delete(id)?;

    let description = match removed {
        Removed::Occurrence(occurrence) => format!("event '{}'", occurrence.title()),
        Removed::Rule(rule) => format!("series '{}'", rule.series_name()),
        Removed::FixedRule(rule) => format!("fixed rule '{}'", rule.name()),
    };
    let success_style = Style::new().green().bold();
    println!("{} Deleted {}", "✓".style(success_style), description);
    Ok(())
}
