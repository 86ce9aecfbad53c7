//! Typed endpoint wrappers.
//!
//! [`Courseware`] exposes one method per backend operation. Each returns
//! the call's [`Outcome`] with the `data` field decoded; a success body that
//! does not match the expected shape becomes a generic application error.
//! Forms are sent as given, so callers validate them first.

mod admin;
mod auth;
mod catalog;
mod profile;

use serde::de::DeserializeOwned;
use tracing::warn;

use coursekit_core::{ApiFailure, Outcome, Result, SessionState};

use crate::client::{ApiClient, ApiResponse, Payload};
use crate::request::ApiRequest;

/// The coursekit backend, one method per endpoint.
#[derive(Debug, Clone)]
pub struct Courseware {
    client: ApiClient,
}

impl Courseware {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &SessionState {
        self.client.session()
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Outcome<Payload<T>>> {
        Ok(decode(self.client.call(&request).await?))
    }

    async fn fetch_message(&self, request: ApiRequest) -> Result<Outcome<Payload<()>>> {
        Ok(self.client.call(&request).await?.map(ApiResponse::discard_data))
    }
}

fn decode<T: DeserializeOwned>(outcome: Outcome<ApiResponse>) -> Outcome<Payload<T>> {
    outcome.and_then(|response| match response.decode() {
        Ok(payload) => Outcome::Success(payload),
        Err(e) => {
            warn!(error = %e, "Unexpected response data");
            Outcome::ApplicationError(ApiFailure::generic())
        }
    })
}
