use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures a vote request can end in.
///
/// `InvalidRequest` and `InvalidVoteId` are raised before any state is
/// touched. `Storage` means the backing store could not be reached or
/// answered with an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VoteError {
    #[error("Invalid data")]
    InvalidRequest,
    #[error("Invalid vote ID")]
    InvalidVoteId,
    #[error("Storage error: {0}")]
    Storage(String),
}

/// JSON error body, `{"detail": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

impl VoteError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, VoteError::InvalidRequest | VoteError::InvalidVoteId)
    }

    /// Body sent back to the caller. Storage failures are not described
    /// beyond a generic message.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            VoteError::Storage(_) => ErrorDetail::new("Internal server error"),
            other => ErrorDetail::new(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, VoteError>;
