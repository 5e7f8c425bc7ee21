use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("No calendar at '{}'. Run `almanac init <NAME>` first.", .0.display())]
    MissingCalendar(PathBuf),

    #[error("A calendar already exists at '{}'. Pass --force to replace it.", .0.display())]
    CalendarExists(PathBuf),

    #[error("No item found with ID prefix '{0}'")]
    NoMatch(String),

    #[error("Ambiguous ID prefix '{0}'")]
    AmbiguousId(String, Vec<(Uuid, String)>),

    #[error("No memo with text '{0}'")]
    MissingMemo(String),
}
