use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Transport,
    HttpStatus,
    Malformed,
}

/// Failure to obtain the partner dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to reach partner data source: {0}")]
    Transport(String),
    #[error("partner data source answered with HTTP status {status}")]
    Status { status: u16 },
    #[error("malformed partner document: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FetchError::Transport(_) => ErrorCode::Transport,
            FetchError::Status { .. } => ErrorCode::HttpStatus,
            FetchError::Malformed(_) => ErrorCode::Malformed,
        }
    }
}
