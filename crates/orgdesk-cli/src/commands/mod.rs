//! CLI command implementations for orgdesk.

pub mod check;
pub mod init_db;
pub mod serve;
pub mod session;

use anyhow::{Context, Result};
use orgdesk_auth::AuthSessionManager;
use orgdesk_core::OrgdeskConfig;
use orgdesk_store::{connect_store, create_slot};
use std::path::Path;

/// Load the configuration file, or defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<OrgdeskConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(OrgdeskConfig::default());
    }
    OrgdeskConfig::from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Open the configured backends and restore the CLI's session slot.
pub async fn open_session(config: &OrgdeskConfig) -> Result<AuthSessionManager> {
    let store = connect_store(&config.credential_store)
        .await
        .context("Failed to open credential store")?;
    let slot = create_slot(&config.session).context("Failed to open session slot")?;

    let manager = AuthSessionManager::new(store, slot, config.session.key.clone());
    manager.restore().await;
    Ok(manager)
}
