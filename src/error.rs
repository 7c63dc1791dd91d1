// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the gateway, the session store and the flows built on them.

use reqwest::StatusCode;

/// Failure of a backend call, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, undecodable body).
    #[error("Network error: {0}")]
    Network(String),

    /// Missing, expired or rejected credentials (HTTP 401).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Request rejected by the server or by local input checks (4xx).
    #[error("Invalid request ({status}): {message}")]
    Validation { status: u16, message: String },

    /// Backend failure (5xx).
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The call succeeded but its result could not be written to the
    /// local session.
    #[error("Session storage error: {0}")]
    Session(String),
}

impl ApiError {
    /// Status used for input rejected before any request is sent.
    pub const LOCAL_VALIDATION_STATUS: u16 = 400;

    /// Build a validation error for input rejected on the client side.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::Validation {
            status: Self::LOCAL_VALIDATION_STATUS,
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP status together with its message.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 => ApiError::Auth(message),
            code @ 400..=499 => ApiError::Validation {
                status: code,
                message,
            },
            code => ApiError::Server {
                status: code,
                message,
            },
        }
    }

    /// True when refreshing the session could fix this failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Network(msg) | ApiError::Auth(msg) | ApiError::Session(msg) => msg,
            ApiError::Validation { message, .. } | ApiError::Server { message, .. } => message,
        }
    }
}

/// Session storage failure.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No storage location available: {0}")]
    Location(String),
}

/// Result type alias for gateway calls
pub type Result<T> = std::result::Result<T, ApiError>;
