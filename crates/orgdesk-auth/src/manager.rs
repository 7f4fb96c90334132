//! Session lifecycle: restore, login, logout, register, profile updates.
//!
//! [`AuthSessionManager`] is the single writer of both the in-memory
//! [`Session`] and its persisted snapshot. Operations run to completion and
//! always settle the session in `Authenticated` or `Unauthenticated`; errors
//! are returned to the caller and recorded as the session's `last_error`.
//!
//! Overlapping calls are not serialized here. Callers are expected to hold off
//! new operations while the session reports `loading`.

use crate::error::AuthError;
use crate::session::{Session, SessionState};
use orgdesk_core::{Account, AccountPatch, NewAccount, ProfileSetup, looks_like_email};
use orgdesk_store::{CredentialStore, SessionSlot};
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the session for one client.
pub struct AuthSessionManager {
    store: Arc<dyn CredentialStore>,
    slot: Arc<dyn SessionSlot>,
    slot_key: String,
    session: watch::Sender<Session>,
}

impl AuthSessionManager {
    /// Create a manager whose snapshot lives under `slot_key`.
    ///
    /// The session starts out loading; call [`restore`](Self::restore) next.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        slot: Arc<dyn SessionSlot>,
        slot_key: impl Into<String>,
    ) -> Self {
        let (session, _) = watch::channel(Session::starting());
        Self {
            store,
            slot,
            slot_key: slot_key.into(),
            session,
        }
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Copy of the current session.
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.session.borrow().state()
    }

    pub fn current_account(&self) -> Option<Account> {
        self.session.borrow().account().cloned()
    }

    /// Receiver that observes every session change, including `Loading`.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Load the persisted snapshot, if any.
    ///
    /// A snapshot that fails to decode is deleted and treated as no session.
    pub async fn restore(&self) -> SessionState {
        self.session.send_modify(Session::begin);

        match self.read_snapshot().await {
            Ok(Some(account)) => {
                tracing::debug!(account_id = %account.id, key = %self.slot_key, "Restored session");
                self.session
                    .send_modify(|s| s.settle_authenticated(account));
            }
            Ok(None) => {
                self.session.send_modify(|s| s.settle_empty(None));
            }
            Err(AuthError::StorageCorrupt(reason)) => {
                tracing::warn!(key = %self.slot_key, %reason, "Discarding corrupt session snapshot");
                if let Err(e) = self.slot.delete(&self.slot_key).await {
                    tracing::warn!(key = %self.slot_key, error = %e, "Failed to delete corrupt snapshot");
                }
                self.session.send_modify(|s| s.settle_empty(None));
            }
            Err(e) => {
                tracing::warn!(key = %self.slot_key, error = %e, "Failed to read session snapshot");
                self.session
                    .send_modify(|s| s.settle_empty(Some(e.user_message())));
            }
        }

        self.state()
    }

    /// Authenticate against the credential store.
    ///
    /// The password comparison is an exact, case-sensitive match against the
    /// stored plaintext value. There is no throttling or lockout.
    pub async fn login(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        self.session.send_modify(Session::begin);

        let result = self.try_login(username, password).await;
        match &result {
            Ok(account) => {
                tracing::info!(username, account_id = %account.id, "Login succeeded");
            }
            Err(e) => {
                tracing::warn!(username, kind = ?e.kind(), "Login failed");
            }
        }
        self.settle_sign_in(result).await
    }

    /// Forget the signed-in account. Safe to call when already signed out.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.session.send_modify(Session::begin);

        let deleted = self
            .slot
            .delete(&self.slot_key)
            .await
            .map_err(|e| AuthError::from_store(e, None));

        match deleted {
            Ok(()) => {
                tracing::info!(key = %self.slot_key, "Logged out");
                self.session.send_modify(|s| s.settle_empty(None));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(key = %self.slot_key, error = %e, "Failed to clear session snapshot");
                self.session
                    .send_modify(|s| s.settle_empty(Some(e.user_message())));
                Err(e)
            }
        }
    }

    /// Create an account and sign in as it.
    pub async fn register(&self, request: NewAccount) -> Result<Account, AuthError> {
        self.session.send_modify(Session::begin);

        let username = request.username.clone();
        let result = self.try_register(request).await;
        match &result {
            Ok(account) => {
                tracing::info!(username = %username, account_id = %account.id, "Registered account");
            }
            Err(e) => {
                tracing::warn!(username = %username, kind = ?e.kind(), "Registration failed");
            }
        }
        self.settle_sign_in(result).await
    }

    /// Apply a partial update to the signed-in account.
    ///
    /// On success the session holds exactly the record re-read from the store.
    /// On failure the session's account is left untouched.
    pub async fn update_profile(&self, patch: AccountPatch) -> Result<Account, AuthError> {
        let Some(current) = self.current_account() else {
            let err = AuthError::NotAuthenticated;
            self.session
                .send_modify(|s| s.settle_empty(Some(err.user_message())));
            return Err(err);
        };

        self.session.send_modify(Session::begin);

        match self.try_update(&current, &patch).await {
            Ok(account) => {
                tracing::info!(account_id = %account.id, "Profile updated");
                self.session
                    .send_modify(|s| s.settle_authenticated(account.clone()));
                Ok(account)
            }
            Err(e) => {
                tracing::warn!(account_id = %current.id, error = %e, "Profile update failed");
                let message = e.user_message();
                self.session.send_modify(|s| s.settle_unchanged(message));
                Err(e)
            }
        }
    }

    /// Submit the first-login setup form.
    pub async fn complete_setup(&self, form: ProfileSetup) -> Result<Account, AuthError> {
        let problems = form.problems();
        if !problems.is_empty() {
            let err = AuthError::ValidationFailed(problems);
            let message = err.user_message();
            self.session.send_modify(|s| s.settle_unchanged(message));
            return Err(err);
        }
        self.update_profile(form.into_patch()).await
    }

    /// Clear the last error.
    pub fn reset_error(&self) {
        self.session.send_modify(Session::clear_error);
    }

    async fn try_login(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let credential = self
            .store
            .find_by_username(username)
            .await
            .map_err(|e| AuthError::from_store(e, Some(username)))?
            .ok_or_else(|| AuthError::NotFound(username.to_string()))?;

        match credential.password.as_deref() {
            Some(stored) if !stored.is_empty() && stored == password => {}
            _ => return Err(AuthError::InvalidCredentials),
        }

        if credential.account.status == orgdesk_core::AccountStatus::Inactive {
            tracing::warn!(username, "Inactive account signed in");
        }

        self.write_snapshot(&credential.account).await?;
        Ok(credential.account)
    }

    async fn try_register(&self, request: NewAccount) -> Result<Account, AuthError> {
        let mut problems: Vec<String> = request
            .missing_fields()
            .into_iter()
            .map(|field| format!("{} is required", field))
            .collect();
        if !request.email.trim().is_empty() && !looks_like_email(&request.email) {
            problems.push("Invalid email".to_string());
        }
        if !problems.is_empty() {
            return Err(AuthError::ValidationFailed(problems));
        }

        let username = request.username.clone();
        let account = self
            .store
            .insert(request)
            .await
            .map_err(|e| AuthError::from_store(e, Some(&username)))?;

        self.write_snapshot(&account).await?;
        Ok(account)
    }

    async fn try_update(&self, current: &Account, patch: &AccountPatch) -> Result<Account, AuthError> {
        if patch.is_empty() {
            return Err(AuthError::ValidationFailed(vec![
                "Nothing to update".to_string(),
            ]));
        }
        let mut problems: Vec<String> = patch
            .blanked_fields()
            .into_iter()
            .map(|field| format!("{} is required", field))
            .collect();
        if let Some(email) = &patch.email
            && !email.trim().is_empty()
            && !looks_like_email(email)
        {
            problems.push("Invalid email".to_string());
        }
        if !problems.is_empty() {
            return Err(AuthError::ValidationFailed(problems));
        }

        let username = patch.username.as_deref().unwrap_or(&current.username);
        self.store
            .update(current.id, patch)
            .await
            .map_err(|e| AuthError::from_store(e, Some(username)))?;

        let fresh = self
            .store
            .get(current.id)
            .await
            .map_err(|e| AuthError::from_store(e, None))?;

        self.write_snapshot(&fresh).await?;
        Ok(fresh)
    }

    /// Settle after login or registration. Failure leaves no session behind,
    /// in memory or in the slot.
    async fn settle_sign_in(&self, result: Result<Account, AuthError>) -> Result<Account, AuthError> {
        match result {
            Ok(account) => {
                self.session
                    .send_modify(|s| s.settle_authenticated(account.clone()));
                Ok(account)
            }
            Err(e) => {
                if let Err(clear) = self.slot.delete(&self.slot_key).await {
                    tracing::warn!(key = %self.slot_key, error = %clear, "Failed to clear session snapshot");
                }
                let message = e.user_message();
                self.session
                    .send_modify(|s| s.settle_empty(Some(message)));
                Err(e)
            }
        }
    }

    async fn read_snapshot(&self) -> Result<Option<Account>, AuthError> {
        let raw = self
            .slot
            .read(&self.slot_key)
            .await
            .map_err(|e| AuthError::from_store(e, None))?;

        match raw {
            None => Ok(None),
            Some(raw) => serde_json::from_str::<Account>(&raw)
                .map(Some)
                .map_err(|e| AuthError::StorageCorrupt(e.to_string())),
        }
    }

    async fn write_snapshot(&self, account: &Account) -> Result<(), AuthError> {
        let raw = serde_json::to_string(account)
            .map_err(|e| AuthError::Unknown(format!("failed to encode snapshot: {}", e)))?;
        self.slot
            .write(&self.slot_key, &raw)
            .await
            .map_err(|e| AuthError::from_store(e, None))
    }
}
