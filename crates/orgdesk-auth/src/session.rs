//! In-memory session state.

use orgdesk_core::Account;

/// Coarse state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// An operation is in flight.
    Loading,
    Unauthenticated,
    Authenticated,
}

/// The currently signed-in account, if any.
///
/// Holds a copy of the account as last read, not a live view of the store.
/// The account and the authenticated flag cannot disagree: authenticated is
/// derived from the account being present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account: Option<Account>,
    loading: bool,
    last_error: Option<String>,
}

impl Session {
    /// Empty session as created at startup, before restore has run.
    pub fn starting() -> Self {
        Self {
            account: None,
            loading: true,
            last_error: None,
        }
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_admin(&self) -> bool {
        self.account.as_ref().is_some_and(|a| a.is_admin)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn state(&self) -> SessionState {
        if self.loading {
            SessionState::Loading
        } else if self.account.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// An operation started: loading on, previous error cleared.
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.last_error = None;
    }

    /// Replace the account wholesale and settle.
    pub(crate) fn settle_authenticated(&mut self, account: Account) {
        self.account = Some(account);
        self.loading = false;
        self.last_error = None;
    }

    /// Drop the account and settle, optionally recording an error.
    pub(crate) fn settle_empty(&mut self, error: Option<String>) {
        self.account = None;
        self.loading = false;
        self.last_error = error;
    }

    /// Settle with an error, leaving the account exactly as it was.
    pub(crate) fn settle_unchanged(&mut self, error: String) {
        self.loading = false;
        self.last_error = Some(error);
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::starting()
    }
}
