//! End-to-end session flows driven through the router.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use orgdesk_core::{NewAccount, OrgdeskConfig};
use orgdesk_dashboard::auth::{create_session_token, session_id_from_token};
use orgdesk_dashboard::state::slot_key_for;
use orgdesk_dashboard::{AppState, create_router};
use orgdesk_store::{CredentialStore, FileSlot, MemoryCredentialStore, SessionSlot};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn officer(username: &str, is_admin: bool, is_setup_complete: bool) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        password: "secret123".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: format!("{username}@example.org"),
        position_title: "Treasurer".to_string(),
        is_admin,
        is_setup_complete,
        ..Default::default()
    }
}

struct Harness {
    router: Router,
    store: Arc<MemoryCredentialStore>,
    slot: Arc<FileSlot>,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            MemoryCredentialStore::with_accounts(vec![
                officer("jdoe", false, false),
                officer("treasurer", false, true),
                officer("admin", true, true),
            ])
            .unwrap(),
        );
        let slot = Arc::new(FileSlot::new(dir.path()).unwrap());
        let state = AppState::new(OrgdeskConfig::default(), store.clone(), slot.clone());
        Self {
            router: create_router(state),
            store,
            slot,
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }

    /// Sign in and return the `name=value` cookie pair.
    async fn login(&self, username: &str) -> String {
        let response = self
            .post(
                "/login",
                &format!("username={username}&password=secret123"),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        cookie_pair(&response).expect("login sets the session cookie")
    }
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn cookie_pair(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    set_cookie.split(';').next().map(str::to_string)
}

fn slot_key(cookie: &str) -> String {
    let token = cookie.strip_prefix("orgdesk_session=").unwrap();
    slot_key_for(session_id_from_token(token).unwrap())
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_healthz_is_public() {
    let harness = Harness::new();
    let response = harness.get("/healthz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_guarded_pages_redirect_to_login_without_session() {
    let harness = Harness::new();
    for uri in ["/", "/organizations", "/posts", "/profile", "/officers", "/members"] {
        let response = harness.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }
}

#[tokio::test]
async fn test_unknown_cookie_is_treated_as_signed_out() {
    let harness = Harness::new();
    let response = harness
        .get("/organizations", Some("orgdesk_session=garbage"))
        .await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_failed_login_shows_generic_message() {
    let harness = Harness::new();

    for form in [
        "username=jdoe&password=wrong",
        "username=nobody&password=secret123",
    ] {
        let response = harness.post("/login", form, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(cookie_pair(&response).is_none());
        let body = body_text(response).await;
        assert!(body.contains("Invalid credentials"));
    }
}

#[tokio::test]
async fn test_first_login_goes_to_profile_setup() {
    let harness = Harness::new();
    let response = harness
        .post("/login", "username=jdoe&password=secret123", None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/profile-setup");

    let cookie = cookie_pair(&response).unwrap();
    let persisted = harness.slot.read(&slot_key(&cookie)).await.unwrap();
    let persisted = persisted.expect("snapshot persisted after login");
    assert!(persisted.contains("\"username\":\"jdoe\""));
    assert!(!persisted.contains("secret123"));
}

#[tokio::test]
async fn test_login_lands_on_organizations_once_set_up() {
    let harness = Harness::new();
    let cookie = harness.login("treasurer").await;

    let response = harness.get("/organizations", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Organizations"));
    assert!(body.contains("Posts"));
    assert!(!body.contains("/officers"));

    let response = harness.get("/login", Some(&cookie)).await;
    assert_eq!(location(&response), "/organizations");
}

#[tokio::test]
async fn test_admin_regions_redirect_non_admins_to_landing() {
    let harness = Harness::new();
    let cookie = harness.login("treasurer").await;

    for uri in ["/organizations/table", "/officers", "/members"] {
        let response = harness.get(uri, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/organizations", "{uri}");
    }
}

#[tokio::test]
async fn test_admin_sees_admin_regions() {
    let harness = Harness::new();
    let cookie = harness.login("admin").await;

    let response = harness.get("/officers", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Org Table"));
    assert!(body.contains("Members"));
}

#[tokio::test]
async fn test_login_issues_fresh_session_id() {
    let harness = Harness::new();
    let planted = format!("orgdesk_session={}", create_session_token(Uuid::nil()));
    let planted_key = slot_key(&planted);

    let response = harness
        .post("/login", "username=admin&password=secret123", Some(&planted))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let issued = cookie_pair(&response).unwrap();
    assert_ne!(issued, planted);
    assert!(harness.slot.read(&planted_key).await.unwrap().is_none());

    // The planted cookie stays signed out.
    let response = harness.get("/officers", Some(&planted)).await;
    assert_eq!(location(&response), "/login");

    let response = harness.get("/officers", Some(&issued)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_relogin_discards_previous_session() {
    let harness = Harness::new();
    let first = harness.login("treasurer").await;
    let first_key = slot_key(&first);

    let response = harness
        .post("/login", "username=admin&password=secret123", Some(&first))
        .await;
    let second = cookie_pair(&response).unwrap();
    assert_ne!(second, first);
    assert!(harness.slot.read(&first_key).await.unwrap().is_none());
    assert!(harness.slot.read(&slot_key(&second)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_failed_login_keeps_existing_session() {
    let harness = Harness::new();
    let cookie = harness.login("treasurer").await;

    let response = harness
        .post("/login", "username=treasurer&password=wrong", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = harness.get("/organizations", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_slot_and_cookie() {
    let harness = Harness::new();
    let cookie = harness.login("treasurer").await;
    let key = slot_key(&cookie);
    assert!(harness.slot.read(&key).await.unwrap().is_some());

    let response = harness.post("/logout", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_eq!(cookie_pair(&response).as_deref(), Some("orgdesk_session="));
    assert!(harness.slot.read(&key).await.unwrap().is_none());

    // The old cookie no longer grants access.
    let response = harness.get("/posts", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");

    // Logging out again is harmless.
    let response = harness.get("/logout", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_profile_setup_validates_then_completes() {
    let harness = Harness::new();
    let cookie = harness.login("jdoe").await;

    let response = harness.get("/profile-setup", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = harness
        .post(
            "/profile-setup",
            "first_name=Jane&last_name=Doe&username=jdoe&email=jane%40example.org&password=short",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Password must be at least 8 characters"));

    let response = harness
        .post(
            "/profile-setup",
            "first_name=Jane&last_name=Doe&username=jdoe&email=jane%40example.org&password=longenough",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/organizations");

    let stored = harness.store.find_by_username("jdoe").await.unwrap().unwrap();
    assert!(stored.account.is_setup_complete);
    assert_eq!(stored.password.as_deref(), Some("longenough"));

    let response = harness.get("/profile-setup", Some(&cookie)).await;
    assert_eq!(location(&response), "/organizations");
}

#[tokio::test]
async fn test_profile_update_is_persisted_and_rendered() {
    let harness = Harness::new();
    let cookie = harness.login("treasurer").await;

    let response = harness
        .post(
            "/profile",
            "first_name=Jane&last_name=Doe&email=treasurer%40example.org&position_title=President&bio=&profile_picture_url=",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Profile updated"));
    assert!(body.contains("President"));

    let persisted = harness.slot.read(&slot_key(&cookie)).await.unwrap().unwrap();
    assert!(persisted.contains("President"));

    let response = harness
        .post(
            "/profile",
            "first_name=Jane&last_name=Doe&email=not-an-email&position_title=President",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
