//! Task API error types.

use thiserror::Error;

/// Failure categories surfaced by the task API client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not be sent, or no usable response came back.
    NetworkFailure,
    /// The server answered with a non-success status.
    RemoteRejection,
}

#[derive(Error, Debug)]
pub enum TaskApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Task API error ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl TaskApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Rejected { .. } => FailureKind::RemoteRejection,
            Self::Network(_) | Self::InvalidUrl(_) => FailureKind::NetworkFailure,
        }
    }

    /// HTTP status of a rejection, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidUrl(_) => None,
        }
    }

    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(e) if e.is_decode() => {
                "The task server sent an unreadable response.".to_string()
            }
            Self::Network(_) => "Unable to reach the task server.".to_string(),
            Self::Rejected { status: 404, .. } => "Task not found on the server.".to_string(),
            Self::Rejected { status, .. } if *status >= 500 => {
                format!("The task server failed ({}). Please try again later.", status)
            }
            Self::Rejected { status, .. } => format!("The task server rejected the request ({}).", status),
            Self::InvalidUrl(_) => "The task server address is invalid.".to_string(),
        }
    }
}
