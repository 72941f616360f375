//! Backend error types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur while talking to the recommendation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendError {
    /// Server answered with a non-success status
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Response body could not be decoded into the expected shape
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    /// Client could not be built from the configuration (bad proxy, headers, ...)
    ConfigurationError { message: String },

    /// Connection-level failure
    NetworkError { message: String },
}

impl BackendError {
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            BackendError::TimeoutError {
                seconds: timeout_secs,
            }
        } else if error.is_decode() {
            BackendError::InvalidResponse {
                message: error.to_string(),
                raw_response: None,
            }
        } else {
            BackendError::NetworkError {
                message: error.to_string(),
            }
        }
    }

    /// Whether the failure means the server could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            BackendError::NetworkError { .. } | BackendError::TimeoutError { .. }
        )
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            BackendError::InvalidResponse { message, .. } => {
                write!(f, "Invalid response from backend: {}", message)
            }
            BackendError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            BackendError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}
