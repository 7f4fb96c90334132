//! Error types for the auth crate.

use orgdesk_store::StoreError;
use thiserror::Error;

/// Errors that can occur during session operations.
///
/// `Display` is meant for logs. What a person sees comes from
/// [`AuthError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No account has this username.
    #[error("no account with username '{0}'")]
    NotFound(String),

    /// The account exists but the password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The username is already in use.
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Required fields were missing or malformed.
    #[error("validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// The operation needs a signed-in account.
    #[error("no account is signed in")]
    NotAuthenticated,

    /// The persisted snapshot could not be decoded.
    #[error("persisted session is corrupt: {0}")]
    StorageCorrupt(String),

    /// Collaborator failure with no more specific kind.
    #[error("{0}")]
    Unknown(String),
}

/// Discriminant of [`AuthError`], for callers that only care which kind failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    NotFound,
    InvalidCredentials,
    DuplicateUsername,
    ValidationFailed,
    NotAuthenticated,
    StorageCorrupt,
    Unknown,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::NotFound(_) => AuthErrorKind::NotFound,
            AuthError::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            AuthError::DuplicateUsername(_) => AuthErrorKind::DuplicateUsername,
            AuthError::ValidationFailed(_) => AuthErrorKind::ValidationFailed,
            AuthError::NotAuthenticated => AuthErrorKind::NotAuthenticated,
            AuthError::StorageCorrupt(_) => AuthErrorKind::StorageCorrupt,
            AuthError::Unknown(_) => AuthErrorKind::Unknown,
        }
    }

    /// Message suitable for showing on a form.
    ///
    /// Unknown usernames and wrong passwords read the same so the login form
    /// does not reveal which usernames exist.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotFound(_) | AuthError::InvalidCredentials => {
                "Invalid credentials".to_string()
            }
            AuthError::DuplicateUsername(username) => {
                format!("Username '{}' is already taken", username)
            }
            AuthError::ValidationFailed(problems) => problems.join(". "),
            AuthError::NotAuthenticated => "No user logged in".to_string(),
            AuthError::StorageCorrupt(_) => "Saved session could not be read".to_string(),
            AuthError::Unknown(_) => "An unknown error occurred".to_string(),
        }
    }

    /// Map a collaborator error, naming the username for uniqueness failures.
    pub(crate) fn from_store(err: StoreError, username: Option<&str>) -> Self {
        match err {
            StoreError::UniqueViolation(_) => {
                AuthError::DuplicateUsername(username.unwrap_or_default().to_string())
            }
            StoreError::NotFound => AuthError::Unknown("account no longer exists".to_string()),
            StoreError::Corrupt(reason) => AuthError::StorageCorrupt(reason),
            other => AuthError::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failures_share_a_message() {
        let not_found = AuthError::NotFound("nouser".into());
        let mismatch = AuthError::InvalidCredentials;
        assert_ne!(not_found.kind(), mismatch.kind());
        assert_eq!(not_found.user_message(), mismatch.user_message());
        assert!(not_found.to_string().contains("nouser"));
    }

    #[test]
    fn test_store_errors_map_to_kinds() {
        let dup = AuthError::from_store(StoreError::UniqueViolation("x".into()), Some("jdoe"));
        assert_eq!(dup, AuthError::DuplicateUsername("jdoe".into()));

        let db = AuthError::from_store(StoreError::Database("timeout".into()), None);
        assert_eq!(db.kind(), AuthErrorKind::Unknown);
        assert_eq!(db.user_message(), "An unknown error occurred");
    }

    #[test]
    fn test_validation_message_lists_problems() {
        let err = AuthError::ValidationFailed(vec![
            "email is required".into(),
            "password is required".into(),
        ]);
        assert_eq!(err.user_message(), "email is required. password is required");
    }
}
