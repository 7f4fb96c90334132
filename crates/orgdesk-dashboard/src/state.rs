//! Dashboard application state.

use orgdesk_auth::{AuthSessionManager, RouteGuard};
use orgdesk_core::OrgdeskConfig;
use orgdesk_store::{CredentialStore, SessionSlot};
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state for the dashboard.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: OrgdeskConfig,
    store: Arc<dyn CredentialStore>,
    slot: Arc<dyn SessionSlot>,
    guard: RouteGuard,
}

impl AppState {
    /// Create a new application state over already-opened backends.
    pub fn new(
        config: OrgdeskConfig,
        store: Arc<dyn CredentialStore>,
        slot: Arc<dyn SessionSlot>,
    ) -> Self {
        let guard = RouteGuard::from_config(&config.dashboard);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                slot,
                guard,
            }),
        }
    }

    pub fn config(&self) -> &OrgdeskConfig {
        &self.inner.config
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.inner.guard
    }

    pub fn project_name(&self) -> &str {
        self.inner.config.project_name()
    }

    pub fn slot(&self) -> &Arc<dyn SessionSlot> {
        &self.inner.slot
    }

    /// A fresh, still-loading manager for one browser session.
    pub fn manager_for(&self, sid: Uuid) -> AuthSessionManager {
        AuthSessionManager::new(
            self.inner.store.clone(),
            self.inner.slot.clone(),
            slot_key_for(sid),
        )
    }
}

/// Slot key holding the snapshot of browser session `sid`.
pub fn slot_key_for(sid: Uuid) -> String {
    format!("session-{}", sid.simple())
}
