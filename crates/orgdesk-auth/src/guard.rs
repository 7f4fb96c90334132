//! Route guard for protected and admin-only regions.

use crate::session::{Session, SessionState};
use orgdesk_core::{Account, DashboardConfig};
use tokio::sync::watch;

/// What a region needs from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Any signed-in account.
    Authenticated,
    /// A signed-in account with the elevated role flag.
    Admin,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the region.
    Render,
    /// The session is still loading; render nothing yet and do not redirect.
    Defer,
    /// Send the visitor elsewhere. The attempted destination is not kept.
    Redirect(String),
}

/// Decides access to regions from session state.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
    landing_path: String,
    setup_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl RouteGuard {
    pub fn new(
        login_path: impl Into<String>,
        landing_path: impl Into<String>,
        setup_path: impl Into<String>,
    ) -> Self {
        Self {
            login_path: login_path.into(),
            landing_path: landing_path.into(),
            setup_path: setup_path.into(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            config.login_path.clone(),
            config.landing_path.clone(),
            config.setup_path.clone(),
        )
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    pub fn setup_path(&self) -> &str {
        &self.setup_path
    }

    /// Decide for the session as it is right now.
    pub fn decide(&self, session: &Session, requirement: Requirement) -> GuardDecision {
        match session.state() {
            SessionState::Loading => GuardDecision::Defer,
            SessionState::Unauthenticated => GuardDecision::Redirect(self.login_path.clone()),
            SessionState::Authenticated => match requirement {
                Requirement::Admin if !session.is_admin() => {
                    GuardDecision::Redirect(self.landing_path.clone())
                }
                _ => GuardDecision::Render,
            },
        }
    }

    /// Wait for the session to leave `Loading`, then decide.
    ///
    /// Returns [`GuardDecision::Defer`] only if the manager went away while
    /// still loading.
    pub async fn resolve(
        &self,
        session: &mut watch::Receiver<Session>,
        requirement: Requirement,
    ) -> GuardDecision {
        if let Ok(settled) = session.wait_for(|s| !s.is_loading()).await {
            return self.decide(&settled, requirement);
        }
        let current = session.borrow();
        self.decide(&current, requirement)
    }

    /// Where to go right after signing in: the setup form until the account
    /// has completed it, the landing area afterwards.
    pub fn post_login_destination(&self, account: &Account) -> &str {
        if account.is_setup_complete {
            &self.landing_path
        } else {
            &self.setup_path
        }
    }
}
