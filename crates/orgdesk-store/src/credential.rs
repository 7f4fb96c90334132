//! Credential store backends.

use crate::error::StoreError;
use crate::postgres::PgCredentialStore;
use async_trait::async_trait;
use chrono::Utc;
use orgdesk_core::{
    Account, AccountId, AccountPatch, Credential, CredentialBackend, CredentialStoreConfig,
    NewAccount,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Trait for the account table the session manager authenticates against.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Zero or one row whose username matches exactly.
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError>;

    /// Insert a row and return it as stored.
    ///
    /// Fails with [`StoreError::UniqueViolation`] when the username is taken.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Apply a partial update to the row with this id.
    async fn update(&self, id: AccountId, patch: &AccountPatch) -> Result<(), StoreError>;

    /// Current row for this id.
    async fn get(&self, id: AccountId) -> Result<Account, StoreError>;
}

/// Create a credential store based on configuration.
pub async fn connect_store(
    config: &CredentialStoreConfig,
) -> Result<Arc<dyn CredentialStore>, StoreError> {
    if !config.table_is_valid() {
        return Err(StoreError::Config(format!(
            "invalid table name '{}'",
            config.table
        )));
    }

    match config.backend {
        CredentialBackend::Memory => {
            let store = MemoryCredentialStore::with_accounts(config.accounts.clone())?;
            if store.is_empty() {
                tracing::warn!("In-memory credential store has no accounts; register one to sign in");
            }
            tracing::info!(accounts = store.len(), "Using in-memory credential store");
            Ok(Arc::new(store))
        }
        CredentialBackend::Postgres => {
            let url = config.resolve_database_url().ok_or_else(|| {
                StoreError::Config("database_url or database_url_env is required".to_string())
            })?;
            let store =
                PgCredentialStore::connect(&url, &config.table, config.max_connections).await?;
            tracing::info!(table = %config.table, "Connected to Postgres credential store");
            Ok(Arc::new(store))
        }
    }
}

/// Process-local account table.
#[derive(Default)]
pub struct MemoryCredentialStore {
    rows: RwLock<HashMap<AccountId, Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with accounts.
    pub fn with_accounts(accounts: Vec<NewAccount>) -> Result<Self, StoreError> {
        let store = Self::new();
        for account in accounts {
            store.insert_row(account)?;
        }
        Ok(store)
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_row(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut rows = self.rows.write().map_err(|e| {
            StoreError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        if rows.values().any(|c| c.account.username == account.username) {
            return Err(StoreError::UniqueViolation("username".to_string()));
        }

        let credential = account.into_credential(Uuid::new_v4(), Utc::now());
        let stored = credential.account.clone();
        rows.insert(stored.id, credential);
        Ok(stored)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let rows = self.rows.read().map_err(|e| {
            StoreError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(rows
            .values()
            .find(|c| c.account.username == username)
            .cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        self.insert_row(account)
    }

    async fn update(&self, id: AccountId, patch: &AccountPatch) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|e| {
            StoreError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(username) = &patch.username
            && rows
                .values()
                .any(|c| c.account.id != id && &c.account.username == username)
        {
            return Err(StoreError::UniqueViolation("username".to_string()));
        }

        let row = rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply_to(row, Utc::now());
        Ok(())
    }

    async fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        let rows = self.rows.read().map_err(|e| {
            StoreError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;
        rows.get(&id)
            .map(|c| c.account.clone())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn officer(username: &str) -> NewAccount {
        NewAccount {
            username: username.into(),
            password: "secret1".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: format!("{}@example.edu", username),
            position_title: "Secretary".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryCredentialStore::new();
        let account = store.insert(officer("jdoe")).await.unwrap();

        let found = store.find_by_username("jdoe").await.unwrap().unwrap();
        assert_eq!(found.account, account);
        assert_eq!(found.password.as_deref(), Some("secret1"));

        assert!(store.find_by_username("JDOE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryCredentialStore::with_accounts(vec![officer("jdoe")]).unwrap();
        let err = store.insert(officer("jdoe")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_then_get() {
        let store = MemoryCredentialStore::new();
        let account = store.insert(officer("jdoe")).await.unwrap();
        let patch = AccountPatch {
            position_title: Some("President".into()),
            ..Default::default()
        };
        store.update(account.id, &patch).await.unwrap();

        let reread = store.get(account.id).await.unwrap();
        assert_eq!(reread.position_title, "President");
        assert_eq!(reread.created_at, account.created_at);
    }

    #[tokio::test]
    async fn test_update_rename_collision() {
        let store = MemoryCredentialStore::new();
        store.insert(officer("taken")).await.unwrap();
        let account = store.insert(officer("jdoe")).await.unwrap();
        let patch = AccountPatch {
            username: Some("taken".into()),
            ..Default::default()
        };
        let err = store.update(account.id, &patch).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        assert_eq!(store.get(account.id).await.unwrap().username, "jdoe");
    }

    #[tokio::test]
    async fn test_missing_row() {
        let store = MemoryCredentialStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(id).await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.update(id, &AccountPatch::default()).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let config = CredentialStoreConfig {
            backend: CredentialBackend::Memory,
            accounts: vec![officer("jdoe")],
            ..Default::default()
        };
        let store = connect_store(&config).await.unwrap();
        assert!(store.find_by_username("jdoe").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_len_counts_seeded_and_inserted_rows() {
        let store = MemoryCredentialStore::new();
        assert!(store.is_empty());

        let store =
            MemoryCredentialStore::with_accounts(vec![officer("jdoe"), officer("asmith")]).unwrap();
        assert_eq!(store.len(), 2);
        store.insert(officer("treasurer")).await.unwrap();
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_table() {
        let config = CredentialStoreConfig {
            backend: CredentialBackend::Memory,
            table: "officers;--".into(),
            ..Default::default()
        };
        assert!(matches!(
            connect_store(&config).await,
            Err(StoreError::Config(_))
        ));
    }
}
