//! User-facing account types.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInputError;

/// Access tier of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Premium,
    #[default]
    Free,
}

impl Role {
    /// The wire name (`ADMIN`, `PREMIUM`, `FREE`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Premium => "PREMIUM",
            Role::Free => "FREE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "PREMIUM" => Ok(Role::Premium),
            "FREE" => Ok(Role::Free),
            _ => Err(InvalidInputError::Role {
                value: s.to_string(),
            }),
        }
    }
}

/// The signed-in user as the backend describes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "last_name")]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Ids of classes the user has already watched.
    #[serde(default, rename = "viewedClasses")]
    pub viewed_class_ids: BTreeSet<i64>,
}

impl UserProfile {
    /// Merge the fields present in `update` into this profile.
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            last_name,
            username,
            email,
            role,
            viewed_class_ids,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
        if let Some(username) = username {
            self.username = username;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(role) = role {
            self.role = role;
        }
        if let Some(ids) = viewed_class_ids {
            self.viewed_class_ids = ids;
        }
    }

    /// Returns true if the user has watched the given class.
    pub fn has_viewed(&self, class_id: i64) -> bool {
        self.viewed_class_ids.contains(&class_id)
    }
}

/// A partial profile, as returned by the profile edit endpoints.
///
/// `editProfile` answers with `last_name`, the user payload elsewhere uses
/// `lastName`; both spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    #[serde(rename = "viewedClasses")]
    pub viewed_class_ids: Option<BTreeSet<i64>>,
}

/// A user as seen from the admin search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub email: String,
    pub role: Role,
}

/// Account counts per paid tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTotals {
    pub free: u64,
    pub premium: u64,
}
