//! HTTP client with transparent access-token rotation.

use std::convert::Infallible;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, trace, warn};

use coursekit_core::error::{StorageError, TransportError};
use coursekit_core::{AccessToken, ApiFailure, ApiUrl, Credentials, Outcome, Result, SessionState};

use crate::request::ApiRequest;

/// Request header carrying the refresh token.
const REFRESH_TOKEN_HEADER: &str = "refresh_token";

/// Response header carrying a freshly minted access token.
const TOKEN_HEADER: &str = "token";

/// The `{data, message}` envelope of a successful response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResponse {
    /// Endpoint-specific payload; `null` when the endpoint returns none.
    #[serde(default)]
    pub data: Value,
    /// Human-readable confirmation, when the backend sends one.
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiResponse {
    /// Decode `data` into a typed payload.
    pub fn decode<T: DeserializeOwned>(self) -> serde_json::Result<Payload<T>> {
        let data = serde_json::from_value(self.data)?;
        Ok(Payload {
            data,
            message: self.message,
        })
    }

    /// Keep only the message, for endpoints whose data is irrelevant.
    pub fn discard_data(self) -> Payload<()> {
        Payload {
            data: (),
            message: self.message,
        }
    }
}

/// A decoded success response.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload<T> {
    pub data: T,
    pub message: Option<String>,
}

/// A non-2xx response, reduced to what classification needs.
#[derive(Debug)]
struct Rejection {
    status: StatusCode,
    token: Option<AccessToken>,
    message: Option<String>,
}

/// Result of a single HTTP exchange.
#[derive(Debug)]
enum Attempt {
    /// Resolved without classification: a success, or a transport or
    /// decoding failure.
    Resolved(Outcome<ApiResponse>),
    Rejected(Rejection),
}

/// Client for the coursekit backend.
///
/// Authenticated requests carry `Authorization: Bearer <access>` and
/// `refresh_token: <refresh>` from the session's credential store. Failed
/// authenticated requests are classified as follows:
///
/// 1. `403` with a non-empty `token` header: the token is persisted and the
///    request is re-sent once. A second such answer is not retried.
/// 2. Any other status with a `token` header: an application error.
/// 3. No `token` header: the session is reset and the call resolves to
///    [`Outcome::SessionInvalid`].
///
/// Token rotations are compare-and-set against the credential store. When
/// two calls are rejected for the same stale token, the first rotation is
/// kept and the second call retries with it. Store I/O runs on tokio's
/// blocking pool.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api: ApiUrl,
    session: SessionState,
}

impl ApiClient {
    /// Create a client using the transport's default timeout.
    pub fn new(api: ApiUrl, session: SessionState) -> Result<Self> {
        Self::build(api, session, None)
    }

    /// Create a client with a per-request timeout.
    pub fn with_timeout(api: ApiUrl, session: SessionState, timeout: Duration) -> Result<Self> {
        Self::build(api, session, Some(timeout))
    }

    fn build(api: ApiUrl, session: SessionState, timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("coursekit/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|e| TransportError::Client {
            message: e.to_string(),
        })?;

        Ok(Self {
            http,
            api,
            session,
        })
    }

    /// Returns the backend base URL.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Returns the session this client resets on terminal failures.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Send a request and classify the result.
    ///
    /// Expected failures are folded into the returned [`Outcome`]; `Err` is
    /// reserved for credential store faults.
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn call(&self, request: &ApiRequest) -> Result<Outcome<ApiResponse>> {
        if !request.requires_auth() {
            return Ok(self.call_public(request).await);
        }

        let mut is_retry = false;
        loop {
            let Some(credentials) = self.run_blocking(|session| session.store().read()).await?
            else {
                debug!("No stored credentials, skipping request");
                return Ok(Outcome::SessionInvalid);
            };

            let rejection = match self.send(request, Some(&credentials)).await {
                Attempt::Resolved(outcome) => return Ok(outcome),
                Attempt::Rejected(rejection) => rejection,
            };

            let Rejection {
                status,
                token,
                message,
            } = rejection;

            match classify(status, token, message.as_deref()) {
                Outcome::Success(never) => match never {},
                Outcome::RetryableExpiry(fresh) => {
                    self.rotate(credentials.access_token(), &fresh).await?;

                    if !is_retry {
                        debug!("Access token expired, retrying once");
                        is_retry = true;
                        continue;
                    }

                    warn!(status = status.as_u16(), "Rotated token rejected again");
                    if message.is_some() {
                        return Ok(Outcome::ApplicationError(ApiFailure::from_response(
                            status.as_u16(),
                            message,
                        )));
                    }
                    self.run_blocking(SessionState::reset).await?;
                    return Ok(Outcome::SessionInvalid);
                }
                Outcome::ApplicationError(failure) => {
                    debug!(status = status.as_u16(), "Application error");
                    return Ok(Outcome::ApplicationError(failure));
                }
                Outcome::SessionInvalid => {
                    warn!(status = status.as_u16(), "Session rejected by backend, signing out");
                    self.run_blocking(SessionState::reset).await?;
                    return Ok(Outcome::SessionInvalid);
                }
            }
        }
    }

    async fn call_public(&self, request: &ApiRequest) -> Outcome<ApiResponse> {
        match self.send(request, None).await {
            Attempt::Resolved(outcome) => outcome,
            Attempt::Rejected(rejection) => Outcome::ApplicationError(ApiFailure::from_response(
                rejection.status.as_u16(),
                rejection.message,
            )),
        }
    }

    async fn send(&self, request: &ApiRequest, credentials: Option<&Credentials>) -> Attempt {
        let url = self.api.endpoint(request.path());
        let mut builder = self.http.request(request.method().clone(), &url);

        if let Some(credentials) = credentials {
            builder = builder
                .bearer_auth(credentials.access_token().as_str())
                .header(REFRESH_TOKEN_HEADER, credentials.refresh_token().as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Request failed without a response");
                return Attempt::Resolved(Outcome::ApplicationError(ApiFailure::generic()));
            }
        };

        let status = response.status();
        trace!(status = %status, "Response received");

        let token = response
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(AccessToken::new);

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                warn!(error = %e, "Failed to read response body");
                return Attempt::Resolved(Outcome::ApplicationError(ApiFailure::generic()));
            }
            Err(e) => {
                debug!(error = %e, "Failed to read error body");
                Default::default()
            }
        };

        if status.is_success() {
            return Attempt::Resolved(match parse_envelope(&body) {
                Ok(response) => Outcome::Success(response),
                Err(e) => {
                    warn!(error = %e, "Malformed success body");
                    Outcome::ApplicationError(ApiFailure::generic())
                }
            });
        }

        Attempt::Rejected(Rejection {
            status,
            token,
            message: server_message(&body),
        })
    }

    /// Persist a rotated access token unless another call already did.
    async fn rotate(&self, sent: &AccessToken, fresh: &AccessToken) -> Result<()> {
        let (sent, fresh) = (sent.clone(), fresh.clone());
        let replaced = self
            .run_blocking(move |session| session.store().replace_access_token(&sent, &fresh))
            .await?;

        if replaced {
            info!("Access token rotated");
        } else {
            debug!("Stored access token already rotated or cleared");
        }
        Ok(())
    }

    /// Run a credential store or session operation on the blocking pool.
    pub(crate) async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&SessionState) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let session = self.session.clone();
        match tokio::task::spawn_blocking(move || op(&session)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(StorageError::Interrupted {
                message: e.to_string(),
            }
            .into()),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api", &self.api)
            .field("session", &self.session)
            .finish()
    }
}

/// Classify a rejected authenticated request.
///
/// The `token` header is checked first, then the status, then the message.
fn classify(status: StatusCode, token: Option<AccessToken>, message: Option<&str>) -> Outcome<Infallible> {
    match token {
        Some(token) if status == StatusCode::FORBIDDEN => Outcome::RetryableExpiry(token),
        Some(_) => Outcome::ApplicationError(ApiFailure::from_response(
            status.as_u16(),
            message.map(str::to_string),
        )),
        None => Outcome::SessionInvalid,
    }
}

fn parse_envelope(body: &[u8]) -> serde_json::Result<ApiResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApiResponse::default());
    }
    serde_json::from_slice(body)
}

/// Extract a non-blank `message` from an error body.
fn server_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}
