//! Catalog types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::user::Role;
use crate::error::InvalidInputError;

/// Difficulty level of a course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Basic => "BASIC",
            Level::Intermediate => "INTERMEDIATE",
            Level::Advanced => "ADVANCED",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BASIC" => Ok(Level::Basic),
            "INTERMEDIATE" => Ok(Level::Intermediate),
            "ADVANCED" => Ok(Level::Advanced),
            _ => Err(InvalidInputError::Level {
                value: s.to_string(),
            }),
        }
    }
}

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub level: Level,
    /// URL slug used to address the course.
    pub name_url: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A single class (lesson) within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Minimum role required to watch the class.
    pub role: Role,
    #[serde(default)]
    pub class_number: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Id of the course this class belongs to.
    pub route_id: i64,
    pub video_url: String,
}

impl Class {
    /// Returns true if a user with `role` may watch this class.
    pub fn is_accessible_to(&self, role: Role) -> bool {
        match self.role {
            Role::Free => true,
            Role::Premium => matches!(role, Role::Premium | Role::Admin),
            Role::Admin => role == Role::Admin,
        }
    }
}
