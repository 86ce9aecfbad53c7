//! Error types for coursekit.
//!
//! Expected request failures never show up here: they are folded into an
//! [`Outcome`](crate::Outcome). This type covers the faults that callers are
//! not expected to recover from in-flow (broken persistence, bad
//! configuration) plus input validation.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for coursekit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Credential persistence failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The HTTP transport could not be set up.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Input validation errors (URLs, form fields, enum values).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Credential store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but cannot be parsed.
    #[error("corrupt credential file {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    /// A store operation running off the async runtime did not complete.
    #[error("credential store task did not complete: {message}")]
    Interrupted { message: String },
}

/// Transport setup errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {message}")]
    Client { message: String },
}

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Malformed email address.
    #[error("invalid email '{value}'")]
    Email { value: String },

    /// Password does not meet the strength rules.
    #[error("invalid password: {reason}")]
    Password { reason: String },

    /// Username outside the allowed charset or length.
    #[error("invalid username '{value}': {reason}")]
    Username { value: String, reason: String },

    /// A named form field failed a length or format rule.
    #[error("invalid {field}: {reason}")]
    Field { field: &'static str, reason: String },

    /// Verification code of the wrong shape.
    #[error("invalid verification code: {reason}")]
    VerificationCode { reason: String },

    /// Unknown role name.
    #[error("unknown role '{value}'")]
    Role { value: String },

    /// Unknown course level name.
    #[error("unknown level '{value}'")]
    Level { value: String },

    /// A request payload could not be encoded as JSON.
    #[error("cannot encode request body: {message}")]
    Body { message: String },
}
