//! Process-local credential store.

use std::sync::RwLock;

use crate::traits::CredentialStore;
use crate::{AccessToken, Credentials, RefreshToken, Result};

#[derive(Debug, Default)]
struct Slots {
    access_token: Option<AccessToken>,
    refresh_token: Option<RefreshToken>,
}

/// A [`CredentialStore`] that lives only as long as the process.
///
/// Useful for tests and for embedders that handle persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slots: RwLock<Slots>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a credential pair.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            slots: RwLock::new(Slots {
                access_token: Some(credentials.access_token().clone()),
                refresh_token: Some(credentials.refresh_token().clone()),
            }),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self) -> Result<Option<Credentials>> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        Ok(match (&slots.access_token, &slots.refresh_token) {
            (Some(access), Some(refresh)) => Some(Credentials::new(access.clone(), refresh.clone())),
            _ => None,
        })
    }

    fn write(&self, access_token: &AccessToken, refresh_token: &RefreshToken) -> Result<()> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.access_token = Some(access_token.clone());
        slots.refresh_token = Some(refresh_token.clone());
        Ok(())
    }

    fn write_access_token(&self, access_token: &AccessToken) -> Result<()> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.access_token = Some(access_token.clone());
        Ok(())
    }

    fn replace_access_token(&self, expected: &AccessToken, fresh: &AccessToken) -> Result<bool> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        if slots.refresh_token.is_none() || slots.access_token.as_ref() != Some(expected) {
            return Ok(false);
        }
        slots.access_token = Some(fresh.clone());
        Ok(true)
    }

    fn clear(&self) -> Result<()> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        *slots = Slots::default();
        Ok(())
    }
}
