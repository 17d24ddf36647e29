use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{EntryId, Position};

/// Failures of the position allocator itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    #[error("entry {0} is not among the waiting entries")]
    NotFound(EntryId),

    /// `max` is the largest valid target index for the sequence.
    #[error("target index {index} is out of range (max {max})")]
    TargetOutOfRange { index: usize, max: usize },

    /// No integer is left strictly between the neighbours. `None` stands for
    /// an open end of the list.
    #[error("no free position between {prev:?} and {next:?}")]
    Exhausted {
        prev: Option<Position>,
        next: Option<Position>,
    },
}

/// Failures talking to the waiting-list service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("service responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("invalid service url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("no waiting list is open")]
    NoListOpen,

    #[error("no waiting list exists for {0}")]
    NoListForDay(NaiveDate),

    #[error("entry {0} not found on this list")]
    EntryNotFound(EntryId),

    #[error("entry {0} is completed and cannot be moved")]
    EntryCompleted(EntryId),

    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("search needs a name or a date")]
    EmptyQuery,

    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
