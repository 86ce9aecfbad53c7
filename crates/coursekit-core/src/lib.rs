//! coursekit-core - Core types for the coursekit course platform client.
//!
//! This crate holds everything that does not touch the network: tokens and
//! their persistence contract, session state, the per-call [`Outcome`]
//! classification, domain models and form validation.

pub mod credentials;
pub mod error;
pub mod memory;
pub mod models;
pub mod outcome;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;
pub mod validation;

pub use credentials::Credentials;
pub use error::Error;
pub use memory::MemoryCredentialStore;
pub use models::{Class, Course, Level, ProfileUpdate, Role, UserProfile};
pub use outcome::{ApiFailure, GENERIC_ERROR_MESSAGE, Outcome, SESSION_EXPIRED_MESSAGE};
pub use session::{Session, SessionState};
pub use tokens::{AccessToken, RefreshToken};
pub use traits::CredentialStore;
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
