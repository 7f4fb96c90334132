//! Session cookie, route guard middleware and the login/logout handlers.
//!
//! Each browser carries a cookie naming its session slot. Every request
//! builds an [`AuthSessionManager`] for that slot and restores it before the
//! guard decides, which is the server-side equivalent of a page load.

use axum::{
    Form,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use base64::Engine;
use orgdesk_auth::{AuthSessionManager, GuardDecision, Requirement};
use orgdesk_store::SessionSlot;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::DashboardError;
use crate::pages;
use crate::state::{AppState, slot_key_for};

/// Session token prefix for validation
const SESSION_PREFIX: &str = "orgdesk_session_";

/// Browser sessions never expire on their own; only logout ends them.
const SESSION_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// The restored session of the current request.
///
/// Inserted as a request extension by the guard middleware.
#[derive(Clone)]
pub struct SessionContext {
    pub sid: Uuid,
    pub manager: Arc<AuthSessionManager>,
}

impl SessionContext {
    /// Restore the session named by the request cookie, or start an empty one
    /// under a fresh id when there is no usable cookie.
    pub async fn load(state: &AppState, headers: &HeaderMap) -> Self {
        let sid = cookie_session_id(state, headers).unwrap_or_else(Uuid::new_v4);

        let manager = state.manager_for(sid);
        let restored = manager.restore().await;
        tracing::debug!(slot = manager.slot_key(), state = ?restored, "Session restored");

        Self {
            sid,
            manager: Arc::new(manager),
        }
    }
}

/// The session id named by the request cookie, if it carries a valid token.
fn cookie_session_id(state: &AppState, headers: &HeaderMap) -> Option<Uuid> {
    let cookie_name = &state.config().dashboard.cookie_name;
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| extract_session_cookie(cookies, cookie_name))
        .and_then(|token| session_id_from_token(&token))
}

/// Guard middleware for regions open to any signed-in account.
pub async fn require_authenticated(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    guarded(state, Requirement::Authenticated, request, next).await
}

/// Guard middleware for admin-only regions.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    guarded(state, Requirement::Admin, request, next).await
}

async fn guarded(
    state: AppState,
    requirement: Requirement,
    mut request: Request,
    next: Next,
) -> Response {
    let context = SessionContext::load(&state, request.headers()).await;
    let mut session = context.manager.subscribe();
    let decision = state.guard().resolve(&mut session, requirement).await;

    match decision {
        GuardDecision::Render => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        GuardDecision::Defer => {
            let mut response = (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(pages::loading_page(state.project_name())),
            )
                .into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
            response
        }
        GuardDecision::Redirect(to) => {
            tracing::debug!(
                path = %request.uri().path(),
                redirect = %to,
                ?requirement,
                "Guard redirect"
            );
            Redirect::to(&to).into_response()
        }
    }
}

/// Extract session cookie value from cookie header
pub fn extract_session_cookie(cookies: &str, cookie_name: &str) -> Option<String> {
    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{}=", cookie_name)) {
            return Some(value.to_string());
        }
    }
    None
}

/// Create the cookie token for a browser session.
pub fn create_session_token(sid: Uuid) -> String {
    let token = format!("{}{}", SESSION_PREFIX, sid);
    base64::engine::general_purpose::STANDARD.encode(token)
}

/// Decode a cookie token back into its session id.
pub fn session_id_from_token(token: &str) -> Option<Uuid> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(token)
        .ok()?;
    let token = String::from_utf8(decoded).ok()?;
    let sid = token.strip_prefix(SESSION_PREFIX)?;
    Uuid::parse_str(sid).ok()
}

fn session_cookie(state: &AppState, sid: Uuid) -> String {
    let dashboard = &state.config().dashboard;
    let secure = if dashboard.secure_cookie { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        dashboard.cookie_name,
        create_session_token(sid),
        SESSION_MAX_AGE_SECS,
        secure
    )
}

fn clear_session_cookie(state: &AppState) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        state.config().dashboard.cookie_name
    )
}

/// Login form data
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Handler for the login page (GET)
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let context = SessionContext::load(&state, &headers).await;
    if let Some(account) = context.manager.current_account() {
        return Redirect::to(state.guard().post_login_destination(&account)).into_response();
    }
    Html(pages::login_page(state.project_name(), "", None)).into_response()
}

/// Handler for login form submission (POST)
///
/// A successful login always lands in a newly minted session id. The id the
/// browser arrived with is never promoted, so a cookie planted before login
/// stays signed out. Its snapshot, if any, is discarded.
pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let previous = cookie_session_id(&state, &headers);
    let sid = Uuid::new_v4();
    let manager = state.manager_for(sid);

    match manager.login(&form.username, &form.password).await {
        Ok(account) => {
            if let Some(previous) = previous {
                let key = slot_key_for(previous);
                if let Err(e) = state.slot().delete(&key).await {
                    tracing::warn!(key = %key, error = %e, "Failed to discard previous session");
                }
            }
            let destination = state.guard().post_login_destination(&account);
            (
                [(header::SET_COOKIE, session_cookie(&state, sid))],
                Redirect::to(destination),
            )
                .into_response()
        }
        Err(err) => {
            let message = err.user_message();
            let status = DashboardError::from(err).status();
            (
                status,
                Html(pages::login_page(
                    state.project_name(),
                    &form.username,
                    Some(&message),
                )),
            )
                .into_response()
        }
    }
}

/// Handler for logout (GET or POST)
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let context = SessionContext::load(&state, &headers).await;
    if let Err(err) = context.manager.logout().await {
        tracing::warn!(error = %err, "Logout did not clear the session slot");
    }

    (
        [(header::SET_COOKIE, clear_session_cookie(&state))],
        Redirect::to(state.guard().login_path()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trips_session_id() {
        let sid = Uuid::new_v4();
        let token = create_session_token(sid);
        assert_eq!(session_id_from_token(&token), Some(sid));
    }

    #[test]
    fn test_foreign_tokens_are_rejected() {
        let foreign = base64::engine::general_purpose::STANDARD.encode("someapp_auth_admin");
        assert_eq!(session_id_from_token(&foreign), None);
        assert_eq!(session_id_from_token("not base64!"), None);
        let bad_uuid = base64::engine::general_purpose::STANDARD.encode("orgdesk_session_xyz");
        assert_eq!(session_id_from_token(&bad_uuid), None);
    }

    #[test]
    fn test_extract_session_cookie() {
        let cookies = "theme=dark; orgdesk_session=abc=; other=1";
        assert_eq!(
            extract_session_cookie(cookies, "orgdesk_session"),
            Some("abc=".to_string())
        );
        assert_eq!(extract_session_cookie("theme=dark", "orgdesk_session"), None);
    }
}
