//! Backend error types

use thiserror::Error;

/// Errors returned by backend calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401/403 from the backend
    #[error("{message}")]
    Unauthorized { status: u16, message: String },

    /// Any other non-success status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Request never completed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Success response whose body could not be parsed
    #[error("Parse error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build the error for a failed status, classifying 401/403 as unauthorized
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 401 || status == 403 {
            ApiError::Unauthorized { status, message }
        } else {
            ApiError::Http { status, message }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// HTTP status, when the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
