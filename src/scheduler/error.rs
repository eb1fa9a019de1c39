use thiserror::Error;

use crate::fs::LogError;
use crate::models::{Status, TaskId, TransitionError};

/// Failures reported by scheduler operations.
///
/// None of these are fatal: each is either rejected before any mutation or
/// reported after the in-memory state is already consistent.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The id is not in the collection the operation reads from.
    #[error("Task [#{id}] not found in {} tasks", .stage.label().to_lowercase())]
    NotFound { id: TaskId, stage: Status },

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Strict mode only: the finish was rolled back because the log write failed.
    #[error("Task [#{id}] was not finished: {source}")]
    Persistence {
        id: TaskId,
        #[source]
        source: LogError,
    },
}

impl SchedulerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchedulerError::NotFound { .. })
    }
}
