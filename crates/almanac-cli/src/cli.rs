use almanac_core::clock::TickUnit;
use almanac_core::reminder::Cadence;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Calendar engine driver: expand recurring events, inspect days and simulate the clock
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Calendar file to operate on (defaults to the configured `calendar_file`)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Pin "now" for this invocation ("dd/MM/yyyy" or "dd/MM/yyyy hh:mm:am")
    #[arg(long, global = true)]
    pub now: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a new, empty calendar file
    Init(InitCommand),
    /// Add a one-off event
    Add(AddCommand),
    /// Add a recurring series
    Recur(RecurCommand),
    /// Add a fixed "Nth weekday of the month" rule, such as a holiday
    Holiday(HolidayCommand),
    /// Attach a reminder to an event or series
    Remind(RemindCommand),
    /// Delete an event, series or fixed rule
    Delete(DeleteCommand),
    /// Show one item by id
    Show(ShowCommand),
    /// Everything on one day, in time order
    Day(DayCommand),
    /// Everything between two dates
    Between(BetweenCommand),
    /// Past, ongoing and upcoming events relative to now
    Status(StatusCommand),
    /// Reminders due now
    Alerts(AlertsCommand),
    /// Advance the simulated clock and report reminders that fired
    Tick(TickCommand),
    /// Manage memos
    Memo(MemoCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct InitCommand {
    /// The name of the calendar
    pub name: String,
    /// Overwrite an existing calendar file
    #[arg(long)]
    pub force: bool,
}

/// Date plus start and end times of day
#[derive(Args, Debug, Clone)]
pub struct SpanArgs {
    /// Date in dd/MM/yyyy
    #[arg(short, long)]
    pub date: String,
    /// Start time in hh:mm:am|pm
    #[arg(short, long)]
    pub start: String,
    /// End time in hh:mm:am|pm (defaults to the start time)
    #[arg(short, long)]
    pub end: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the event
    pub title: String,
    #[command(flatten)]
    pub span: SpanArgs,
    /// Tags to add to the event
    #[arg(short, long, num_args = 1..)]
    pub tag: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RecurCommand {
    /// The name of the series
    pub series: String,
    /// The title of each occurrence
    pub title: String,
    #[command(flatten)]
    pub span: SpanArgs,
    /// Repetition: daily, monthly, yearly, or one or more weekdays (mon,wed)
    #[arg(long, value_delimiter = ',', required = true)]
    pub every: Vec<String>,
    /// Stop after this many periods
    #[arg(long, conflicts_with = "until")]
    pub count: Option<u32>,
    /// Stop at this date (dd/MM/yyyy)
    #[arg(long)]
    pub until: Option<String>,
    /// Tags shared by every occurrence
    #[arg(short, long, num_args = 1..)]
    pub tag: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct HolidayCommand {
    /// The name of the rule
    pub name: String,
    /// Weekday, 0 = Sunday through 6 = Saturday
    #[arg(long)]
    pub day: u32,
    /// Week of the month, 1 through 5
    #[arg(long)]
    pub week: u32,
    /// Month 1 through 12, or 13 for every month
    #[arg(long, default_value_t = 13)]
    pub month: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct RemindCommand {
    /// The ID (or unique prefix) of an event or series
    pub id: String,
    /// The reminder text
    pub message: String,
    /// Fire date (dd/MM/yyyy)
    #[arg(long)]
    pub date: String,
    /// Fire time (hh:mm:am|pm)
    #[arg(long)]
    pub time: String,
    /// Repeat at this cadence from the given moment up to the event's start
    #[arg(long, value_parser = parse_cadence)]
    pub every: Option<Cadence>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or unique prefix) of the item to delete
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID (or unique prefix) of the item to show
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DayCommand {
    /// The date to show (dd/MM/yyyy); defaults to today
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct BetweenCommand {
    /// First date, inclusive (dd/MM/yyyy)
    pub from: String,
    /// Last date, inclusive (dd/MM/yyyy)
    pub to: String,
    /// Sort the result by start time
    #[arg(long)]
    pub sorted: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Past,
    Ongoing,
    Upcoming,
}

#[derive(Parser, Debug, Clone)]
pub struct StatusCommand {
    /// Only show one phase
    #[arg(value_enum)]
    pub phase: Option<Phase>,
}

#[derive(Parser, Debug, Clone)]
pub struct AlertsCommand {
    /// Every reminder within the classification window instead of just the ones due now
    #[arg(long)]
    pub all: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TickCommand {
    /// Tick unit (sec, min, hour, day, week)
    #[arg(long, value_parser = parse_tick_unit)]
    pub unit: Option<TickUnit>,
    /// Units per tick
    #[arg(long)]
    pub amount: Option<i64>,
    /// Number of ticks
    #[arg(long)]
    pub ticks: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct MemoCommand {
    #[command(subcommand)]
    pub command: MemoSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MemoSubcommand {
    /// Create a new memo
    Add(AddMemoCommand),
    /// Attach an event to a memo
    Link(LinkMemoCommand),
    /// List memos
    List,
    /// Delete a memo
    Delete(DeleteMemoCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddMemoCommand {
    /// The memo text
    pub text: String,
}

#[derive(Parser, Debug, Clone)]
pub struct LinkMemoCommand {
    /// The memo's exact text
    pub memo: String,
    /// The ID (or unique prefix) of the event
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteMemoCommand {
    /// The memo's exact text
    pub memo: String,
}

fn parse_cadence(s: &str) -> Result<Cadence, String> {
    s.parse::<Cadence>().map_err(|e| e.to_string())
}

fn parse_tick_unit(s: &str) -> Result<TickUnit, String> {
    s.parse::<TickUnit>().map_err(|e| e.to_string())
}
