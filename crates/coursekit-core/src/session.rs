//! In-memory session state.

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::models::{ProfileUpdate, UserProfile};
use crate::traits::CredentialStore;
use crate::Result;

/// A point-in-time view of who is signed in.
///
/// The user is present exactly when the session is authenticated, so an
/// authenticated session without a profile cannot be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<UserProfile>,
}

impl Session {
    /// Returns true if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns the signed-in user.
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}

/// Shared, injectable session state.
///
/// Cheap to clone; all clones observe the same session. It owns a handle to
/// the [`CredentialStore`] so that logging out clears persisted tokens in
/// the same step.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use coursekit_core::{MemoryCredentialStore, SessionState, UserProfile};
///
/// let session = SessionState::new(Arc::new(MemoryCredentialStore::new()));
/// session.set_authenticated(UserProfile::default());
/// assert!(session.is_authenticated());
///
/// session.reset().unwrap();
/// assert!(!session.is_authenticated());
/// ```
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    current: RwLock<Session>,
    store: Arc<dyn CredentialStore>,
}

impl SessionState {
    /// Create a logged-out session bound to a credential store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                current: RwLock::new(Session::default()),
                store,
            }),
        }
    }

    /// Returns the credential store this session clears on logout.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    /// Returns a copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.inner
            .current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns true if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_authenticated()
    }

    /// Returns a copy of the signed-in user.
    pub fn user(&self) -> Option<UserProfile> {
        self.inner
            .current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .user
            .clone()
    }

    /// Mark the session authenticated, replacing the user wholesale.
    pub fn set_authenticated(&self, user: UserProfile) {
        let mut current = self.inner.current.write().unwrap_or_else(|e| e.into_inner());
        info!(username = %user.username, role = %user.role, "Session authenticated");
        current.user = Some(user);
    }

    /// Merge a partial profile into the signed-in user.
    ///
    /// Returns false, changing nothing, when nobody is signed in.
    pub fn update_user(&self, update: ProfileUpdate) -> bool {
        let mut current = self.inner.current.write().unwrap_or_else(|e| e.into_inner());
        match current.user.as_mut() {
            Some(user) => {
                user.apply(update);
                debug!("Session user updated");
                true
            }
            None => {
                debug!("Ignoring profile update for signed-out session");
                false
            }
        }
    }

    /// Log out: clear persisted credentials and forget the user.
    ///
    /// Both effects happen under the session write lock, so no reader can
    /// observe a signed-out session while tokens are still persisted. If the
    /// store fails to clear, the session is left untouched and the error is
    /// returned. Calling this repeatedly is harmless.
    pub fn reset(&self) -> Result<()> {
        let mut current = self.inner.current.write().unwrap_or_else(|e| e.into_inner());
        self.inner.store.clear()?;
        if current.user.take().is_some() {
            info!("Session reset");
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::{AccessToken, MemoryCredentialStore, RefreshToken};

    fn ada() -> UserProfile {
        UserProfile {
            name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            role: Role::Premium,
            viewed_class_ids: Default::default(),
        }
    }

    fn seeded() -> (SessionState, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .write(&AccessToken::new("a"), &RefreshToken::new("r"))
            .unwrap();
        (SessionState::new(store.clone()), store)
    }

    #[test]
    fn starts_signed_out() {
        let (session, _) = seeded();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn set_authenticated_populates_user() {
        let (session, _) = seeded();
        session.set_authenticated(ada());

        let snapshot = session.snapshot();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.user().unwrap().email, "ada@example.com");
    }

    #[test]
    fn update_user_merges_into_current_user() {
        let (session, _) = seeded();
        session.set_authenticated(ada());

        let applied = session.update_user(ProfileUpdate {
            email: Some("countess@example.com".into()),
            ..Default::default()
        });

        assert!(applied);
        let user = session.user().unwrap();
        assert_eq!(user.email, "countess@example.com");
        assert_eq!(user.username, "ada");
    }

    #[test]
    fn update_user_is_ignored_when_signed_out() {
        let (session, _) = seeded();
        assert!(!session.update_user(ProfileUpdate::default()));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn reset_clears_session_and_store() {
        let (session, store) = seeded();
        session.set_authenticated(ada());

        session.reset().unwrap();

        assert!(!session.is_authenticated());
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn reset_is_idempotent() {
        let (session, store) = seeded();
        session.set_authenticated(ada());

        session.reset().unwrap();
        let first = session.snapshot();
        session.reset().unwrap();

        assert_eq!(session.snapshot(), first);
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn clones_share_state() {
        let (session, _) = seeded();
        let other = session.clone();
        session.set_authenticated(ada());
        assert!(other.is_authenticated());
    }
}
