//! Credential store trait.

use crate::{AccessToken, Credentials, RefreshToken, Result};

/// Persistence for the access/refresh token pair.
///
/// Implementations must never expose a partial pair: [`read`](Self::read)
/// returns `None` unless both tokens are present, and after
/// [`clear`](Self::clear) nothing of the previous pair remains.
///
/// The operations are synchronous and may block, for instance on a file
/// lock held by another process. Async callers should run them on a
/// blocking thread (`tokio::task::spawn_blocking`) rather than on a runtime
/// worker.
pub trait CredentialStore: Send + Sync {
    /// Returns the persisted pair, or `None` when either token is missing.
    fn read(&self) -> Result<Option<Credentials>>;

    /// Persist both tokens, replacing any previous pair.
    fn write(&self, access_token: &AccessToken, refresh_token: &RefreshToken) -> Result<()>;

    /// Replace only the access token, keeping the refresh token.
    fn write_access_token(&self, access_token: &AccessToken) -> Result<()>;

    /// Replace the access token only if the stored one equals `expected`.
    ///
    /// The comparison and the write happen as one step with respect to every
    /// other handle on the same storage. Returns `false`, leaving the store
    /// untouched, when the stored token differs or no pair is stored.
    fn replace_access_token(&self, expected: &AccessToken, fresh: &AccessToken) -> Result<bool>;

    /// Remove both tokens.
    fn clear(&self) -> Result<()>;
}
