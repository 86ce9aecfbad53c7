//! coursekit-http - HTTP client for the coursekit backend.
//!
//! [`ApiClient`] sends requests, attaches the stored bearer and refresh
//! tokens, and folds every response into an [`Outcome`]. When the backend
//! answers `403` with a fresh `token` header, the client persists it and
//! retries once. [`Courseware`] layers one typed method per endpoint on top.
//!
//! [`Outcome`]: coursekit_core::Outcome

mod client;
pub mod endpoints;
mod request;
mod service;

pub use client::{ApiClient, ApiResponse, Payload};
pub use request::ApiRequest;
pub use service::Courseware;
