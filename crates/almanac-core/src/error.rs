use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Recurrence rule not found: {0}")]
    RuleNotFound(Uuid),

    #[error("Occurrence not found: {0}")]
    OccurrenceNotFound(Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
