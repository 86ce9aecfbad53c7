//! coursekit-file - File-backed credential store.
//!
//! Persists the access/refresh token pair as a small JSON document so a
//! session survives process restarts.

mod store;

pub use store::FileCredentialStore;
