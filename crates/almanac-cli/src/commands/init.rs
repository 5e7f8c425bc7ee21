use almanac_core::calendar::Calendar;
use almanac_core::moment::Moment;
use almanac_core::timeline::TimelineConfig;
use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use std::path::Path;

use crate::cli::InitCommand;
use crate::error::CliError;
use crate::store::Store;

pub fn init_calendar(path: &Path, command: &InitCommand, now: Option<Moment>, config: TimelineConfig) -> Result<()> {
    if path.exists() && !command.force {
        return Err(CliError::CalendarExists(path.to_path_buf()).into());
    }

    let store = Store::new(Calendar::with_config(command.name.clone(), config), now);
    store.save(path)?;

    let success_style = Style::new().green().bold();
    println!(
        "{} Created calendar: {}",
        "✓".style(success_style),
        command.name.bright_white().bold()
    );
    println!("  {} {}", "File:".bright_black(), path.display());
    Ok(())
}
