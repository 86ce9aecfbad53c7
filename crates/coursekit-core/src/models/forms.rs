//! Request payloads sent to the backend.
//!
//! Field names follow the backend's wire format, which mixes `snake_case`
//! (account endpoints) and `camelCase` (catalog endpoints).

use std::fmt;

use serde::Serialize;

use super::course::Level;
use super::user::Role;
use crate::error::InvalidInputError;
use crate::validation;

/// Email and password for `auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::email(&self.email)?;
        validation::login_password(&self.password)
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// New account details for `auth/register`.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub username: String,
    pub name: String,
    pub last_name: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::email(&self.email)?;
        validation::new_password(&self.password)?;
        validation::username(&self.username)?;
        validation::name("name", &self.name)?;
        validation::name("last name", &self.last_name)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Emailed code confirming an account, for `auth/verify`.
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub email: String,
    pub verification_code: String,
}

impl Verification {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::email(&self.email)?;
        validation::verification_code(&self.verification_code)
    }
}

/// A bare email address (`auth/resendCode`, `auth/forgotPassword`,
/// `admin/getUser`).
#[derive(Debug, Clone, Serialize)]
pub struct EmailAddress {
    pub email: String,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::email(&self.email)
    }
}

/// Password reset with an emailed code, for `auth/recoveryPassword`.
#[derive(Clone, Serialize)]
pub struct PasswordRecovery {
    pub email: String,
    pub password: String,
    pub verification_code: String,
}

impl PasswordRecovery {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::email(&self.email)?;
        validation::new_password(&self.password)?;
        validation::verification_code(&self.verification_code)
    }
}

impl fmt::Debug for PasswordRecovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordRecovery")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("verification_code", &self.verification_code)
            .finish()
    }
}

/// Name and username change, for `client/editProfile`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileEdit {
    pub name: String,
    pub last_name: String,
    pub username: String,
}

impl ProfileEdit {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::name("name", &self.name)?;
        validation::name("last name", &self.last_name)?;
        validation::username(&self.username)
    }
}

/// Email change confirmed with the current password, for `client/editEmail`.
#[derive(Clone, Serialize)]
pub struct EmailChange {
    pub email: String,
    pub password: String,
}

impl EmailChange {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::email(&self.email)?;
        validation::login_password(&self.password)
    }
}

impl fmt::Debug for EmailChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailChange")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Password change, for `client/editPassword`.
#[derive(Clone, Serialize)]
pub struct PasswordChange {
    pub password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::login_password(&self.password)?;
        validation::new_password(&self.new_password)
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange")
            .field("password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .finish()
    }
}

/// Course fields for `admin/createCourse`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub level: Level,
    pub name_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewCourse {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::title(&self.title)?;
        validation::required("description", &self.description)?;
        validation::slug(&self.name_url)
    }
}

/// An existing course with replacement fields, for `admin/editCourse`.
#[derive(Debug, Clone, Serialize)]
pub struct CourseEdit {
    pub id: i64,
    #[serde(flatten)]
    pub course: NewCourse,
}

impl CourseEdit {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        self.course.validate()
    }
}

/// Class fields for `admin/createClass`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub title: String,
    pub description: String,
    pub role: Role,
    /// Id of the owning course.
    pub route_id: i64,
    pub video_url: String,
}

impl NewClass {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::title(&self.title)?;
        validation::required("description", &self.description)?;
        validation::video_url(&self.video_url)
    }
}

/// An existing class with replacement fields, for `admin/editClass`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEdit {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub role: Role,
    pub video_url: String,
}

impl ClassEdit {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::title(&self.title)?;
        validation::required("description", &self.description)?;
        validation::video_url(&self.video_url)
    }
}

/// Body of the delete endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecordId {
    pub id: i64,
}

/// Role assignment, for `admin/editUserRole`.
#[derive(Debug, Clone, Serialize)]
pub struct RoleChange {
    pub email: String,
    pub role: Role,
}

impl RoleChange {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validation::email(&self.email)
    }
}
