use almanac_core::error::CoreError;
use anyhow::Result;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::CliError;
use crate::parser::parse_moment;
use crate::store::Store;

mod cli;
mod commands;
mod config;
mod error;
mod parser;
mod store;
mod util;
mod views;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = Config::new().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable configuration");
        Config::default()
    });

    if let Err(e) = run(cli, config) {
        handle_error(e);
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("almanac_core=debug,almanac_cli=debug")
    } else {
        EnvFilter::try_from_env("ALMANAC_LOG")
            .unwrap_or_else(|_| EnvFilter::new("almanac_core=warn,almanac_cli=info"))
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact()
                .with_filter(filter),
        )
        .init();
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let path = cli.file.unwrap_or_else(|| config.calendar_file.clone());
    let pinned = cli.now.as_deref().map(parse_moment).transpose()?;

    if let Commands::Init(command) = &cli.command {
        return commands::init::init_calendar(&path, command, pinned, config.timeline);
    }

    let mut store = Store::load(&path, config.timeline)?;
    let mut clock = store.clock(pinned);

    let mutated = match cli.command {
        Commands::Init(_) => false,
        Commands::Add(command) => {
            commands::add::add_event(&mut store, command)?;
            true
        }
        Commands::Recur(command) => {
            commands::add::add_series(&mut store, command)?;
            true
        }
        Commands::Holiday(command) => {
            commands::add::add_holiday(&mut store, command)?;
            true
        }
        Commands::Remind(command) => {
            commands::remind::add_reminder(&mut store, command)?;
            true
        }
        Commands::Delete(command) => {
            commands::delete::delete_item(&mut store, command)?;
            true
        }
        Commands::Show(command) => {
            commands::list::show_item(&store, command, &clock)?;
            false
        }
        Commands::Day(command) => {
            commands::list::list_day(&store, command, &clock)?;
            false
        }
        Commands::Between(command) => {
            commands::list::list_between(&store, command, &clock)?;
            false
        }
        Commands::Status(command) => {
            commands::list::list_status(&store, command, &clock)?;
            false
        }
        Commands::Alerts(command) => {
            commands::alerts::list_alerts(&store, command, &clock)?;
            false
        }
        Commands::Tick(command) => {
            commands::tick::run_ticks(&mut store, command, config.driver, &mut clock)?;
            true
        }
        Commands::Memo(command) => {
            commands::memo::memo_command(&mut store, command)?;
            true
        }
    };

    if mutated {
        store.save(&path)?;
    }
    Ok(())
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(cli_error) = err.downcast_ref::<CliError>() {
        match cli_error {
            CliError::AmbiguousId(prefix, candidates) => {
                eprintln!("{} Ambiguous ID '{}'.", "Error:".style(error_style), prefix);
                eprintln!("Did you mean one of these?");
                for (id, title) in candidates {
                    eprintln!("  {} ({})", id.yellow(), title);
                }
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), cli_error),
        }
    } else if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::OccurrenceNotFound(id) | CoreError::RuleNotFound(id) => {
                eprintln!("{} Nothing on the calendar with ID '{}'", "Error:".style(error_style), id.yellow());
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), core_error),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
