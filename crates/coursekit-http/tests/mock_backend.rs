//! Mock backend tests for the coursekit HTTP client.
//!
//! These tests use wiremock to simulate the backend and check the token
//! rotation and session invalidation rules end to end.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use coursekit_core::models::{LoginForm, ProfileEdit};
use coursekit_core::{
    AccessToken, ApiUrl, CredentialStore, Credentials, GENERIC_ERROR_MESSAGE,
    MemoryCredentialStore, Outcome, RefreshToken, Role, SessionState, UserProfile,
};
use coursekit_http::{ApiClient, ApiRequest, Courseware};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Backend {
    server: MockServer,
    store: Arc<MemoryCredentialStore>,
    session: SessionState,
    courseware: Courseware,
}

impl Backend {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryCredentialStore::new());
        let session = SessionState::new(store.clone());
        let api = ApiUrl::new(server.uri()).unwrap();
        let client = ApiClient::new(api, session.clone()).unwrap();

        Self {
            server,
            store,
            session,
            courseware: Courseware::new(client),
        }
    }

    /// Start with a stored token pair and a signed-in user.
    async fn signed_in(access: &str, refresh: &str) -> Self {
        let backend = Self::start().await;
        backend
            .store
            .write(&AccessToken::new(access), &RefreshToken::new(refresh))
            .unwrap();
        backend.session.set_authenticated(ada());
        backend
    }

    fn stored_access_token(&self) -> Option<String> {
        self.store
            .read()
            .unwrap()
            .map(|c| c.access_token().as_str().to_string())
    }

    async fn request_count(&self) -> usize {
        self.server.received_requests().await.unwrap().len()
    }

    async fn bearer_tokens(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter_map(|r| r.headers.get("authorization"))
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }
}

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

fn user_json() -> serde_json::Value {
    json!({
        "name": "Ada",
        "lastName": "Lovelace",
        "username": "ada",
        "email": "ada@example.com",
        "role": "PREMIUM",
        "viewedClasses": [1, 4]
    })
}

// ============================================================================
// Authenticated calls
// ============================================================================

#[tokio::test]
async fn test_no_credentials_short_circuits() {
    let backend = Backend::start().await;

    let outcome = backend.courseware.current_user().await.unwrap();

    assert!(matches!(outcome, Outcome::SessionInvalid));
    assert_eq!(backend.request_count().await, 0);
}

#[tokio::test]
async fn test_credentials_are_attached() {
    let backend = Backend::signed_in("access-1", "refresh-1").await;

    Mock::given(method("GET"))
        .and(path("/client/getDataUser"))
        .and(header("authorization", "Bearer access-1"))
        .and(header("refresh_token", "refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": user_json() })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.current_user().await.unwrap();

    let payload = outcome.success().expect("success");
    assert_eq!(payload.data.username, "ada");
    assert!(payload.data.has_viewed(4));
}

#[tokio::test]
async fn test_stale_token_is_rotated_and_retried_once() {
    let backend = Backend::signed_in("stale", "refresh-1").await;

    Mock::given(method("GET"))
        .and(path("/admin/getTotalUsers"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(403).insert_header("token", "fresh"))
        .expect(1)
        .mount(&backend.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/getTotalUsers"))
        .and(header("authorization", "Bearer fresh"))
        .and(header("refresh_token", "refresh-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "free": 12, "premium": 3 } })),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.user_totals().await.unwrap();

    let totals = outcome.success().expect("success").data;
    assert_eq!((totals.free, totals.premium), (12, 3));
    assert_eq!(backend.stored_access_token().as_deref(), Some("fresh"));
    assert!(backend.session.is_authenticated());
}

#[tokio::test]
async fn test_second_expiry_with_message_is_application_error() {
    let backend = Backend::signed_in("stale", "refresh-1").await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(403).insert_header("token", "fresh"))
        .mount(&backend.server)
        .await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("token", "fresher")
                .set_body_json(json!({ "message": "Admins only" })),
        )
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.user_totals().await.unwrap();

    match outcome {
        Outcome::ApplicationError(failure) => {
            assert_eq!(failure.status, Some(403));
            assert_eq!(failure.message, "Admins only");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(backend.request_count().await, 2);
    assert_eq!(backend.stored_access_token().as_deref(), Some("fresher"));
    assert!(backend.session.is_authenticated());
}

#[tokio::test]
async fn test_second_expiry_without_message_invalidates_session() {
    let backend = Backend::signed_in("stale", "refresh-1").await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(403).insert_header("token", "fresh"))
        .mount(&backend.server)
        .await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(403).insert_header("token", "fresher"))
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.current_user().await.unwrap();

    assert!(matches!(outcome, Outcome::SessionInvalid));
    assert_eq!(backend.request_count().await, 2);
    assert!(backend.store.read().unwrap().is_none());
    assert!(!backend.session.is_authenticated());
}

#[tokio::test]
async fn test_token_on_non_forbidden_status_is_not_retried() {
    let backend = Backend::signed_in("access-1", "refresh-1").await;

    Mock::given(method("PUT"))
        .and(path("/client/editProfile"))
        .respond_with(
            ResponseTemplate::new(409)
                .insert_header("token", "fresh")
                .set_body_json(json!({ "message": "Username already taken" })),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let form = ProfileEdit {
        name: "Ada".into(),
        last_name: "Lovelace".into(),
        username: "countess".into(),
    };
    let outcome = backend.courseware.edit_profile(&form).await.unwrap();

    match outcome {
        Outcome::ApplicationError(failure) => {
            assert_eq!(failure.status, Some(409));
            assert_eq!(failure.message, "Username already taken");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(backend.stored_access_token().as_deref(), Some("access-1"));
    assert_eq!(backend.session.user().unwrap().username, "ada");
}

#[tokio::test]
async fn test_rejection_without_token_resets_session() {
    let backend = Backend::signed_in("access-1", "revoked").await;

    Mock::given(method("GET"))
        .and(path("/client/getDataUser"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid refresh token" })),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let first = backend.courseware.current_user().await.unwrap();
    assert!(matches!(first, Outcome::SessionInvalid));
    assert!(backend.store.read().unwrap().is_none());
    assert!(!backend.session.is_authenticated());

    // Later authenticated calls never reach the network.
    let second = backend.courseware.user_totals().await.unwrap();
    assert!(matches!(second, Outcome::SessionInvalid));
    assert_eq!(backend.request_count().await, 1);
}

#[tokio::test]
async fn test_empty_token_header_counts_as_absent() {
    let backend = Backend::signed_in("access-1", "refresh-1").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).insert_header("token", ""))
        .expect(1)
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.current_user().await.unwrap();

    assert!(matches!(outcome, Outcome::SessionInvalid));
    assert!(backend.store.read().unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_success_body_keeps_tokens() {
    let backend = Backend::signed_in("access-1", "refresh-1").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.current_user().await.unwrap();

    match outcome {
        Outcome::ApplicationError(failure) => assert_eq!(failure.message, GENERIC_ERROR_MESSAGE),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(backend.stored_access_token().as_deref(), Some("access-1"));
    assert!(backend.session.is_authenticated());
}

#[tokio::test]
async fn test_concurrent_expiry_keeps_first_rotation() {
    let backend = Backend::signed_in("stale", "refresh-1").await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("token", "fresh-a")
                .set_delay(Duration::from_millis(100)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&backend.server)
        .await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("token", "fresh-b")
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&backend.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/getTotalUsers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "free": 1, "premium": 1 } })),
        )
        .with_priority(10)
        .mount(&backend.server)
        .await;

    let (a, b) = tokio::join!(
        backend.courseware.user_totals(),
        backend.courseware.user_totals()
    );
    assert!(a.unwrap().is_success());
    assert!(b.unwrap().is_success());

    let stored = format!("Bearer {}", backend.stored_access_token().unwrap());
    let tokens = backend.bearer_tokens().await;
    assert_eq!(tokens.len(), 4);

    // Both retries use whichever rotation landed first.
    let retries: Vec<_> = tokens.iter().filter(|t| *t != "Bearer stale").collect();
    assert_eq!(retries, vec![&stored, &stored]);
}

#[tokio::test]
async fn test_clients_sharing_a_store_keep_first_rotation() {
    let backend = Backend::signed_in("stale", "refresh-1").await;
    let other = Courseware::new(
        ApiClient::new(
            ApiUrl::new(backend.server.uri()).unwrap(),
            SessionState::new(backend.store.clone()),
        )
        .unwrap(),
    );

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("token", "fresh-a")
                .set_delay(Duration::from_millis(100)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&backend.server)
        .await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("token", "fresh-b")
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&backend.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/getTotalUsers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "free": 1, "premium": 1 } })),
        )
        .with_priority(10)
        .mount(&backend.server)
        .await;

    let (a, b) = tokio::join!(backend.courseware.user_totals(), other.user_totals());
    assert!(a.unwrap().is_success());
    assert!(b.unwrap().is_success());

    let stored = format!("Bearer {}", backend.stored_access_token().unwrap());
    let retries: Vec<_> = backend
        .bearer_tokens()
        .await
        .into_iter()
        .filter(|t| *t != "Bearer stale")
        .collect();
    assert_eq!(retries, vec![stored.clone(), stored]);
}

/// A store whose reads block the calling thread until released.
struct GatedStore {
    inner: MemoryCredentialStore,
    released: Arc<AtomicBool>,
}

impl CredentialStore for GatedStore {
    fn read(&self) -> coursekit_core::Result<Option<Credentials>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !self.released.load(Ordering::SeqCst) {
            if Instant::now() > deadline {
                return Ok(None);
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        self.inner.read()
    }

    fn write(&self, access_token: &AccessToken, refresh_token: &RefreshToken) -> coursekit_core::Result<()> {
        self.inner.write(access_token, refresh_token)
    }

    fn write_access_token(&self, access_token: &AccessToken) -> coursekit_core::Result<()> {
        self.inner.write_access_token(access_token)
    }

    fn replace_access_token(
        &self,
        expected: &AccessToken,
        fresh: &AccessToken,
    ) -> coursekit_core::Result<bool> {
        self.inner.replace_access_token(expected, fresh)
    }

    fn clear(&self) -> coursekit_core::Result<()> {
        self.inner.clear()
    }
}

#[tokio::test]
async fn test_blocking_store_does_not_stall_the_runtime() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/client/getDataUser"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": user_json() })))
        .expect(1)
        .mount(&server)
        .await;

    let released = Arc::new(AtomicBool::new(false));
    let store = Arc::new(GatedStore {
        inner: MemoryCredentialStore::with_credentials(Credentials::new(
            AccessToken::new("access-1"),
            RefreshToken::new("refresh-1"),
        )),
        released: released.clone(),
    });
    let client = ApiClient::new(ApiUrl::new(server.uri()).unwrap(), SessionState::new(store)).unwrap();
    let courseware = Courseware::new(client);

    // The release runs on the same single-threaded runtime as the call, so
    // it only happens if the store read is off the runtime thread.
    let release = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        released.store(true, Ordering::SeqCst);
    };
    let (outcome, ()) = tokio::join!(courseware.current_user(), release);

    assert!(outcome.unwrap().is_success());
}

// ============================================================================
// Public calls and session establishment
// ============================================================================

#[tokio::test]
async fn test_login_establishes_session() {
    let backend = Backend::start().await;

    let mut data = user_json();
    data["token"] = json!("access-1");
    data["refresh"] = json!("refresh-1");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "Analytical1"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": data, "message": "Welcome" })),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let form = LoginForm::new("ada@example.com", "Analytical1");
    let outcome = backend.courseware.login(&form).await.unwrap();

    let payload = outcome.success().expect("success");
    assert_eq!(payload.message.as_deref(), Some("Welcome"));

    let session = backend.session.snapshot();
    assert!(session.is_authenticated());
    let user = session.user().unwrap();
    assert_eq!(user.last_name, "Lovelace");
    assert_eq!(user.role, Role::Premium);

    let creds = backend.store.read().unwrap().unwrap();
    assert_eq!(creds.access_token().as_str(), "access-1");
    assert_eq!(creds.refresh_token().as_str(), "refresh-1");
}

#[tokio::test]
async fn test_public_error_never_touches_credentials() {
    let backend = Backend::signed_in("access-1", "refresh-1").await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Account not verified" })),
        )
        .mount(&backend.server)
        .await;

    let form = LoginForm::new("ada@example.com", "Analytical1");
    let outcome = backend.courseware.login(&form).await.unwrap();

    match outcome {
        Outcome::ApplicationError(failure) => {
            assert_eq!(failure.status, Some(401));
            assert_eq!(failure.message, "Account not verified");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(backend.stored_access_token().as_deref(), Some("access-1"));
    assert!(backend.session.is_authenticated());
}

#[tokio::test]
async fn test_public_error_without_message_is_generic() {
    let backend = Backend::start().await;

    Mock::given(method("GET"))
        .and(path("/data/getCourses"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.list_courses().await.unwrap();

    match outcome {
        Outcome::ApplicationError(failure) => {
            assert_eq!(failure.status, Some(500));
            assert_eq!(failure.message, GENERIC_ERROR_MESSAGE);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_courses_decodes_catalog() {
    let backend = Backend::start().await;

    Mock::given(method("GET"))
        .and(path("/data/getCourses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 1,
                "title": "Rust from scratch",
                "description": "Ownership and borrowing",
                "level": "BASIC",
                "nameUrl": "rust",
                "imageUrl": null
            }]
        })))
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.list_courses().await.unwrap();

    let courses = outcome.success().expect("success").data;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name_url, "rust");
}

#[tokio::test]
async fn test_restore_populates_session() {
    let backend = Backend::start().await;
    backend
        .store
        .write(&AccessToken::new("access-1"), &RefreshToken::new("refresh-1"))
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/client/getDataUser"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": user_json() })))
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.restore().await.unwrap();

    assert_eq!(outcome.success().map(|u| u.email), Some("ada@example.com".to_string()));
    assert!(backend.session.is_authenticated());
}

#[tokio::test]
async fn test_edit_profile_merges_into_session() {
    let backend = Backend::signed_in("access-1", "refresh-1").await;

    Mock::given(method("PUT"))
        .and(path("/client/editProfile"))
        .and(body_json(json!({
            "name": "Augusta",
            "last_name": "King",
            "username": "countess"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "name": "Augusta", "last_name": "King", "username": "countess" },
            "message": "Profile updated"
        })))
        .mount(&backend.server)
        .await;

    let form = ProfileEdit {
        name: "Augusta".into(),
        last_name: "King".into(),
        username: "countess".into(),
    };
    let outcome = backend.courseware.edit_profile(&form).await.unwrap();
    assert!(outcome.is_success());

    let user = backend.session.user().unwrap();
    assert_eq!(user.last_name, "King");
    assert_eq!(user.username, "countess");
    assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
async fn test_delete_course_sends_id_body() {
    let backend = Backend::signed_in("access-1", "refresh-1").await;

    Mock::given(method("DELETE"))
        .and(path("/admin/deleteCourse"))
        .and(body_json(json!({ "id": 7 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "message": "Course deleted"
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let outcome = backend.courseware.delete_course(7).await.unwrap();

    let payload = outcome.success().expect("success");
    assert!(payload.data.is_empty());
    assert_eq!(payload.message.as_deref(), Some("Course deleted"));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let backend = Backend::signed_in("access-1", "refresh-1").await;

    backend.courseware.logout().unwrap();
    let after_first = backend.session.snapshot();
    backend.courseware.logout().unwrap();

    assert_eq!(backend.session.snapshot(), after_first);
    assert!(!after_first.is_authenticated());
    assert!(backend.store.read().unwrap().is_none());
}

#[tokio::test]
async fn test_raw_call_exposes_envelope() {
    let backend = Backend::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/resendCode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Code sent" })))
        .mount(&backend.server)
        .await;

    let request = ApiRequest::post("auth/resendCode")
        .with_json(&json!({ "email": "ada@example.com" }))
        .unwrap();
    let outcome = backend.courseware.client().call(&request).await.unwrap();

    let response = outcome.success().expect("success");
    assert!(response.data.is_null());
    assert_eq!(response.message.as_deref(), Some("Code sent"));
}
