//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::NetworkError;

/// Main error type for fallible non-network operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EloquiaError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Eloquia operations
pub type Result<T> = std::result::Result<T, EloquiaError>;

/// Errors surfaced by the auth repository.
///
/// Validation-shaped failures carry a user-facing message extracted from the
/// server's error payload (or an endpoint-specific fallback); everything else
/// wraps the underlying [`NetworkError`] unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid code")]
    InvalidCode,

    #[error("Invalid code or email")]
    InvalidCodeOrEmail,

    #[error("Network error: {0}")]
    Network(NetworkError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type alias for auth repository operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;
