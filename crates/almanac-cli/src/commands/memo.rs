use almanac_core::calendar::Calendar;
use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use uuid::Uuid;

use crate::cli::{MemoCommand, MemoSubcommand};
use crate::error::CliError;
use crate::store::Store;
use crate::util::resolve_id;
use crate::views::table::display_memos;

pub fn memo_command(store: &mut Store, command: MemoCommand) -> Result<()> {
    let success_style = Style::new().green().bold();
    match command.command {
        MemoSubcommand::Add(add) => {
            store.calendar.memos_mut().create(add.text.clone());
            println!("{} Created memo: {}", "✓".style(success_style), add.text.bold());
        }
        MemoSubcommand::Link(link) => {
            let id = resolve_id(&store.calendar, &link.id)?;
            let memo_id = memo_id_by_text(&store.calendar, &link.memo)?;
            store.calendar.memos_mut().link(memo_id, id)?;
            println!("{} Linked {} to memo '{}'", "✓".style(success_style), id, link.memo);
        }
        MemoSubcommand::List => {
            let calendar = &store.calendar;
            display_memos(calendar.memos().memos(), |id| title_of(calendar, id));
        }
        MemoSubcommand::Delete(delete) => {
            let memo_id = memo_id_by_text(&store.calendar, &delete.memo)?;
            store.calendar.memos_mut().remove(memo_id);
            println!("{} Deleted memo '{}'", "✓".style(success_style), delete.memo);
        }
    }
    Ok(())
}

fn memo_id_by_text(calendar: &Calendar, text: &str) -> Result<Uuid> {
    calendar
        .memos()
        .find_by_text(text)
        .map(|memo| memo.id)
        .ok_or_else(|| CliError::MissingMemo(text.to_string()).into())
}

fn title_of(calendar: &Calendar, id: Uuid) -> Option<String> {
    let timeline = calendar.timeline();
    timeline
        .occurrences()
        .iter()
        .find(|o| o.id() == id)
        .map(|o| o.title().to_string())
        .or_else(|| timeline.rules().iter().find(|r| r.id() == id).map(|r| r.series_name().to_string()))
        .or_else(|| timeline.fixed_rules().iter().find(|r| r.id() == id).map(|r| r.name().to_string()))
}
