/// Error types for the clinic scheduler.
///
/// `ClinicError` covers contract violations and loader failures. Requests
/// turned down by the validation pipeline travel as `Rejected`, which the
/// command layer prints and recovers from; every other variant is fatal.

use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ClinicError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} is not a valid calendar date")]
    InvalidDate(String),

    #[error("Invalid timeslot {hour:02}:{minute:02}")]
    InvalidTimeslot { hour: u32, minute: u32 },

    #[error("Duplicate NPI: {0}")]
    DuplicateNpi(String),

    #[error("Roster line {line}: {reason}")]
    Roster { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClinicError>;
