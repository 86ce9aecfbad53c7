//! Per-call result classification.

use std::fmt;

use crate::tokens::AccessToken;

/// Fallback text for failures that carry no server message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred, please try again later.";

/// Prompt shown when the session cannot be recovered.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired, please sign in again.";

/// The classification of a single logical API call.
///
/// Every call resolves to exactly one variant. Call sites are expected to
/// `match` on all four: silently dropping [`Outcome::SessionInvalid`] would
/// leave the caller looking authenticated after the session was reset.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The backend accepted the request.
    Success(T),

    /// The backend rotated the access token. The API client consumes this
    /// internally by retrying once; it only reaches callers that inspect a
    /// single raw attempt.
    RetryableExpiry(AccessToken),

    /// The backend (or the transport) reported a failure the user can act on.
    ApplicationError(ApiFailure),

    /// The session is gone: credentials have been cleared and the user must
    /// sign in again.
    SessionInvalid,
}

/// A user-facing failure description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    /// Server-provided message, or [`GENERIC_ERROR_MESSAGE`].
    pub message: String,
}

impl ApiFailure {
    /// A failure from an HTTP response; falls back to the generic message.
    pub fn from_response(status: u16, message: Option<String>) -> Self {
        Self {
            status: Some(status),
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        }
    }

    /// A failure with no response behind it (network, decoding).
    pub fn generic() -> Self {
        Self {
            status: None,
            message: GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl<T> Outcome<T> {
    /// Transform the success payload, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::RetryableExpiry(token) => Outcome::RetryableExpiry(token),
            Outcome::ApplicationError(failure) => Outcome::ApplicationError(failure),
            Outcome::SessionInvalid => Outcome::SessionInvalid,
        }
    }

    /// Chain a fallible step onto the success payload.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::RetryableExpiry(token) => Outcome::RetryableExpiry(token),
            Outcome::ApplicationError(failure) => Outcome::ApplicationError(failure),
            Outcome::SessionInvalid => Outcome::SessionInvalid,
        }
    }

    /// Returns true for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns the payload if this is a success.
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }
}
