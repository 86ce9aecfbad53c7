//! Persisted credential pair.

use std::fmt;

use crate::tokens::{AccessToken, RefreshToken};

/// The access/refresh token pair held by a [`CredentialStore`](crate::CredentialStore).
///
/// A `Credentials` value only exists when both tokens are known; stores
/// report a half-written pair as absent.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_token: AccessToken,
    refresh_token: RefreshToken,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(access_token: AccessToken, refresh_token: RefreshToken) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }

    /// Returns the access token.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the refresh token.
    pub fn refresh_token(&self) -> &RefreshToken {
        &self.refresh_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token)
            .field("refresh_token", &self.refresh_token)
            .finish()
    }
}
