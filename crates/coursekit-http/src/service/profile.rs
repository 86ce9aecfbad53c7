//! The signed-in user's own account.

use tracing::instrument;

use coursekit_core::models::{EmailChange, PasswordChange, ProfileEdit};
use coursekit_core::{Outcome, ProfileUpdate, Result, UserProfile};

use super::Courseware;
use crate::client::Payload;
use crate::endpoints::{CURRENT_USER, EDIT_EMAIL, EDIT_PASSWORD, EDIT_PROFILE};
use crate::request::ApiRequest;

impl Courseware {
    /// Fetch the signed-in user.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<Outcome<Payload<UserProfile>>> {
        self.fetch(ApiRequest::get(CURRENT_USER).authenticated())
            .await
    }

    /// Change name, last name and username. The returned fields are merged
    /// into the session user.
    #[instrument(skip_all, fields(username = %form.username))]
    pub async fn edit_profile(&self, form: &ProfileEdit) -> Result<Outcome<Payload<ProfileUpdate>>> {
        let request = ApiRequest::put(EDIT_PROFILE).authenticated().with_json(form)?;
        self.fetch_update(request).await
    }

    /// Change the account email. The new address is merged into the session
    /// user.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn edit_email(&self, form: &EmailChange) -> Result<Outcome<Payload<ProfileUpdate>>> {
        let request = ApiRequest::put(EDIT_EMAIL).authenticated().with_json(form)?;
        self.fetch_update(request).await
    }

    #[instrument(skip_all)]
    pub async fn edit_password(&self, form: &PasswordChange) -> Result<Outcome<Payload<()>>> {
        self.fetch_message(ApiRequest::put(EDIT_PASSWORD).authenticated().with_json(form)?)
            .await
    }

    async fn fetch_update(&self, request: ApiRequest) -> Result<Outcome<Payload<ProfileUpdate>>> {
        let outcome = self.fetch::<ProfileUpdate>(request).await?;
        if let Outcome::Success(payload) = &outcome {
            self.session().update_user(payload.data.clone());
        }
        Ok(outcome)
    }
}
