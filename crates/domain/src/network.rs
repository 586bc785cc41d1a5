//! Network error taxonomy and the typed request outcome wrapper
//!
//! Every HTTP call in the client terminates in an [`ApiResult`]; the closed
//! [`NetworkError`] set is the only way a request can fail. No other failure
//! causes are permitted.

use thiserror::Error;

/// Closed set of network failure kinds.
///
/// - `Http`: server reachable, request rejected
/// - `Timeout`: no response within the configured window
/// - `Offline`: I/O-level failure, no connectivity
/// - `Decode`: response shape mismatch
/// - `Cancelled`: cooperative cancellation
/// - `Unknown`: uncategorized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("HTTP {status}")]
    Http { status: u16, body: Option<String> },

    #[error("Request timed out")]
    Timeout,

    #[error("No network connectivity")]
    Offline,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Unknown network error")]
    Unknown,
}

/// Typed outcome of a network call.
///
/// Exactly one variant is ever populated: a success value with the response
/// status, or a classified [`NetworkError`]. The request executor never
/// raises; every path terminates in one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult<T> {
    Ok { value: T, status: u16 },
    Err { error: NetworkError },
}

impl<T> ApiResult<T> {
    /// Wrap a classified error.
    pub fn err(error: NetworkError) -> Self {
        Self::Err { error }
    }

    /// `true` when the call succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// Extract the success value, discarding the status.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok { value, .. } => Some(value),
            Self::Err { .. } => None,
        }
    }

    /// Borrow the error, if any.
    pub fn error(&self) -> Option<&NetworkError> {
        match self {
            Self::Ok { .. } => None,
            Self::Err { error } => Some(error),
        }
    }

    /// Map the success value, preserving status and errors.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Ok { value, status } => ApiResult::Ok { value: f(value), status },
            Self::Err { error } => ApiResult::Err { error },
        }
    }

    /// Convert into a standard `Result`, pairing the value with its status.
    pub fn into_result(self) -> Result<(T, u16), NetworkError> {
        match self {
            Self::Ok { value, status } => Ok((value, status)),
            Self::Err { error } => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_status() {
        let result = ApiResult::Ok { value: 2, status: 201 }.map(|v| v * 10);
        assert_eq!(result, ApiResult::Ok { value: 20, status: 201 });
    }

    #[test]
    fn test_map_preserves_error() {
        let result: ApiResult<i32> = ApiResult::err(NetworkError::Timeout);
        assert_eq!(result.map(|v| v * 10), ApiResult::err(NetworkError::Timeout));
    }

    #[test]
    fn test_into_result() {
        let ok: ApiResult<&str> = ApiResult::Ok { value: "hi", status: 200 };
        assert_eq!(ok.into_result(), Ok(("hi", 200)));

        let err: ApiResult<&str> = ApiResult::err(NetworkError::Offline);
        assert_eq!(err.into_result(), Err(NetworkError::Offline));
    }
}
