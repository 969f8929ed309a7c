//! Controller-level errors.

use taskdeck_services::{FailureKind, TaskApiError};
use thiserror::Error;

/// The three ways a controller operation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    RemoteRejection,
    NotFoundLocally,
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Api(#[from] TaskApiError),

    #[error("Task {0} is not in the local list")]
    NotFoundLocally(i64),
}

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::Api(e) => match e.kind() {
                FailureKind::NetworkFailure => ErrorKind::NetworkFailure,
                FailureKind::RemoteRejection => ErrorKind::RemoteRejection,
            },
            TaskError::NotFoundLocally(_) => ErrorKind::NotFoundLocally,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            TaskError::Api(e) => e.user_message(),
            TaskError::NotFoundLocally(_) => "That task is no longer on the board.".to_string(),
        }
    }
}
