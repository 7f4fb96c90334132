//! Credential store and session slot configuration.
//!
//! The credential store is the remote account table. Two methods are
//! supported for locating a Postgres table (in order of precedence):
//! 1. `database_url_env` - reference an environment variable
//! 2. `database_url` - provide the URL directly

use crate::account::NewAccount;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which credential store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// Postgres table accessed through a connection pool.
    #[default]
    Postgres,
    /// Process-local table, seeded from `accounts`.
    Memory,
}

/// Configuration for the account table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialStoreConfig {
    #[serde(default)]
    pub backend: CredentialBackend,

    /// Environment variable name containing the Postgres connection URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url_env: Option<String>,

    /// Full Postgres connection URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Table holding account rows.
    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Accounts inserted into the memory backend at startup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<NewAccount>,
}

impl Default for CredentialStoreConfig {
    fn default() -> Self {
        Self {
            backend: CredentialBackend::default(),
            database_url_env: None,
            database_url: None,
            table: default_table(),
            max_connections: default_max_connections(),
            accounts: Vec::new(),
        }
    }
}

impl CredentialStoreConfig {
    /// Resolve the connection URL, checking `database_url_env` first.
    pub fn resolve_database_url(&self) -> Option<String> {
        if let Some(env_var) = &self.database_url_env
            && let Ok(url) = std::env::var(env_var)
        {
            return Some(url);
        }
        self.database_url.clone()
    }

    /// Table names are interpolated into SQL, so only `[A-Za-z0-9_]` and an
    /// optional single `schema.` prefix are accepted.
    pub fn table_is_valid(&self) -> bool {
        let mut parts = self.table.split('.');
        let valid = |s: &str| {
            !s.is_empty()
                && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !s.starts_with(|c: char| c.is_ascii_digit())
        };
        match (parts.next(), parts.next(), parts.next()) {
            (Some(t), None, None) => valid(t),
            (Some(s), Some(t), None) => valid(s) && valid(t),
            _ => false,
        }
    }
}

/// Which durable slot backend holds persisted session snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotBackend {
    /// One JSON file per key under `directory`.
    #[default]
    File,
    /// Lost when the process exits.
    Memory,
}

/// Configuration for the persisted session slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SlotBackend,

    /// Directory for the file backend.
    #[serde(default = "default_session_directory")]
    pub directory: PathBuf,

    /// Slot key used by single-session clients such as the CLI.
    #[serde(default = "default_session_key")]
    pub key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SlotBackend::default(),
            directory: default_session_directory(),
            key: default_session_key(),
        }
    }
}

fn default_table() -> String {
    "officers".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_session_directory() -> PathBuf {
    PathBuf::from(".orgdesk/sessions")
}

fn default_session_key() -> String {
    "user".to_string()
}
