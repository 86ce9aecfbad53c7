//! Sign-in, registration and account recovery.

use serde::Deserialize;
use tracing::{info, instrument, warn};

use coursekit_core::models::{EmailAddress, LoginForm, PasswordRecovery, Registration, Verification};
use coursekit_core::{AccessToken, ApiFailure, Outcome, RefreshToken, Result, UserProfile};

use super::Courseware;
use crate::client::Payload;
use crate::endpoints::{FORGOT_PASSWORD, LOGIN, RECOVER_PASSWORD, REGISTER, RESEND_CODE, VERIFY};
use crate::request::ApiRequest;

/// `data` of the login and verify responses: the user plus a token pair.
#[derive(Deserialize)]
struct Grant {
    #[serde(flatten)]
    user: UserProfile,
    #[serde(default)]
    token: String,
    #[serde(default)]
    refresh: String,
}

impl Courseware {
    /// Sign in. On success the token pair is persisted and the session is
    /// authenticated with the returned user.
    ///
    /// An unverified account answers with status `401`.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn login(&self, form: &LoginForm) -> Result<Outcome<Payload<UserProfile>>> {
        let request = ApiRequest::post(LOGIN).with_json(form)?;
        self.establish(request).await
    }

    /// Create an account. The backend emails a verification code.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn register(&self, form: &Registration) -> Result<Outcome<Payload<()>>> {
        self.fetch_message(ApiRequest::post(REGISTER).with_json(form)?)
            .await
    }

    /// Confirm an account with its emailed code. Signs in like [`login`].
    ///
    /// [`login`]: Courseware::login
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn verify(&self, form: &Verification) -> Result<Outcome<Payload<UserProfile>>> {
        let request = ApiRequest::post(VERIFY).with_json(form)?;
        self.establish(request).await
    }

    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn resend_code(&self, form: &EmailAddress) -> Result<Outcome<Payload<()>>> {
        self.fetch_message(ApiRequest::post(RESEND_CODE).with_json(form)?)
            .await
    }

    /// Ask for a password recovery code.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn forgot_password(&self, form: &EmailAddress) -> Result<Outcome<Payload<()>>> {
        self.fetch_message(ApiRequest::post(FORGOT_PASSWORD).with_json(form)?)
            .await
    }

    /// Set a new password using a recovery code.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn recover_password(&self, form: &PasswordRecovery) -> Result<Outcome<Payload<()>>> {
        self.fetch_message(ApiRequest::post(RECOVER_PASSWORD).with_json(form)?)
            .await
    }

    /// Rebuild the session from persisted credentials.
    ///
    /// Without stored credentials this resolves to
    /// [`Outcome::SessionInvalid`] without touching the network.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<Outcome<UserProfile>> {
        let outcome = self.current_user().await?;
        if let Outcome::Success(payload) = &outcome {
            self.session().set_authenticated(payload.data.clone());
        }
        Ok(outcome.map(|payload| payload.data))
    }

    /// Sign out locally: forget the user and clear stored credentials.
    pub fn logout(&self) -> Result<()> {
        self.session().reset()
    }

    async fn establish(&self, request: ApiRequest) -> Result<Outcome<Payload<UserProfile>>> {
        match self.fetch::<Grant>(request).await? {
            Outcome::Success(Payload { data: grant, message }) => {
                if grant.token.is_empty() || grant.refresh.is_empty() {
                    warn!("Sign-in response carried no token pair");
                    return Ok(Outcome::ApplicationError(ApiFailure::generic()));
                }

                let (access, refresh) = (
                    AccessToken::new(grant.token),
                    RefreshToken::new(grant.refresh),
                );
                self.client()
                    .run_blocking(move |session| session.store().write(&access, &refresh))
                    .await?;
                self.session().set_authenticated(grant.user.clone());
                info!(username = %grant.user.username, "Signed in");

                Ok(Outcome::Success(Payload {
                    data: grant.user,
                    message,
                }))
            }
            Outcome::RetryableExpiry(token) => Ok(Outcome::RetryableExpiry(token)),
            Outcome::ApplicationError(failure) => Ok(Outcome::ApplicationError(failure)),
            Outcome::SessionInvalid => Ok(Outcome::SessionInvalid),
        }
    }
}
