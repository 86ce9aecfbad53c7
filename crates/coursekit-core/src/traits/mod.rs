//! Core traits for credential persistence.

mod credential_store;

pub use credential_store::CredentialStore;
