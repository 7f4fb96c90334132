//! Configuration types for orgdesk.
//!
//! Configuration is loaded from a single YAML file (`orgdesk.yaml` by
//! default). Every section has defaults, so an empty file is a valid
//! configuration that talks to Postgres through `database_url`.

pub mod dashboard;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use dashboard::DashboardConfig;
pub use store::{CredentialBackend, CredentialStoreConfig, SessionConfig, SlotBackend};

/// Complete orgdesk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrgdeskConfig {
    /// Project name, shown in page titles.
    #[serde(default)]
    pub project: Option<String>,

    /// Account table.
    #[serde(default)]
    pub credential_store: CredentialStoreConfig,

    /// Persisted session slot.
    #[serde(default)]
    pub session: SessionConfig,

    /// Web dashboard.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrgdeskConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Display name for page titles.
    pub fn project_name(&self) -> &str {
        self.project.as_deref().unwrap_or("Orgdesk")
    }

    /// Consistency problems that would stop the dashboard or CLI from working.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let store = &self.credential_store;

        if !store.table_is_valid() {
            problems.push(format!(
                "credential_store.table '{}' is not a valid table name",
                store.table
            ));
        }
        if store.backend == CredentialBackend::Postgres && store.resolve_database_url().is_none() {
            problems.push(
                "credential_store: postgres backend needs database_url or database_url_env"
                    .to_string(),
            );
        }
        if store.backend == CredentialBackend::Postgres && !store.accounts.is_empty() {
            problems.push(
                "credential_store.accounts is only used by the memory backend".to_string(),
            );
        }
        for (index, account) in store.accounts.iter().enumerate() {
            let missing = account.missing_fields();
            if !missing.is_empty() {
                problems.push(format!(
                    "credential_store.accounts[{}] is missing {}",
                    index,
                    missing.join(", ")
                ));
            }
        }

        if self.session.key.trim().is_empty() {
            problems.push("session.key must not be empty".to_string());
        }

        let dashboard = &self.dashboard;
        for (name, path) in [
            ("login_path", &dashboard.login_path),
            ("landing_path", &dashboard.landing_path),
            ("setup_path", &dashboard.setup_path),
        ] {
            if !path.starts_with('/') {
                problems.push(format!("dashboard.{} must start with '/'", name));
            }
        }
        if dashboard.login_path == dashboard.landing_path {
            problems.push("dashboard.login_path and landing_path must differ".to_string());
        }
        if dashboard.cookie_name.is_empty()
            || !dashboard
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            problems.push("dashboard.cookie_name must be a plain token".to_string());
        }

        problems
    }
}
