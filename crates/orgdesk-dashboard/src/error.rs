//! Error types for the dashboard crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orgdesk_auth::{AuthError, AuthErrorKind};
use thiserror::Error;

/// Errors that can occur in the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Failed to start the server.
    #[error("failed to start dashboard: {0}")]
    StartupFailed(String),

    /// A session operation failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl DashboardError {
    pub fn status(&self) -> StatusCode {
        match self {
            DashboardError::Auth(err) => match err.kind() {
                AuthErrorKind::NotFound
                | AuthErrorKind::InvalidCredentials
                | AuthErrorKind::NotAuthenticated => StatusCode::UNAUTHORIZED,
                AuthErrorKind::DuplicateUsername => StatusCode::CONFLICT,
                AuthErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
                AuthErrorKind::StorageCorrupt | AuthErrorKind::Unknown => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            DashboardError::StartupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Dashboard request failed");
        }
        let body = match &self {
            DashboardError::Auth(err) => err.user_message(),
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}
