//! Durable key-value slots for persisted session snapshots.
//!
//! A slot holds one serialized value per key. The session manager is the only
//! writer; everything else reads the in-memory session it restores.

use crate::error::StoreError;
use async_trait::async_trait;
use orgdesk_core::{SessionConfig, SlotBackend};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Trait for session slot backends.
#[async_trait]
pub trait SessionSlot: Send + Sync {
    /// Store a value, replacing whatever the key held.
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Value for the key, or `None` when absent.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove the key. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Create a slot backend based on configuration.
pub fn create_slot(config: &SessionConfig) -> Result<Arc<dyn SessionSlot>, StoreError> {
    match config.backend {
        SlotBackend::Memory => Ok(Arc::new(MemorySlot::new())),
        SlotBackend::File => Ok(Arc::new(FileSlot::new(&config.directory)?)),
    }
}

/// Slot held in process memory.
#[derive(Default)]
pub struct MemorySlot {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionSlot for MemorySlot {
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|e| {
            StoreError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|e| {
            StoreError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(entries.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|e| {
            StoreError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;
        entries.remove(key);
        Ok(())
    }
}

/// Slot stored as one `<key>.json` file per key under a directory.
pub struct FileSlot {
    directory: PathBuf,
}

impl FileSlot {
    /// Create a file slot, creating the directory if it doesn't exist.
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, StoreError> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.exists() {
            fs::create_dir_all(&directory)?;
        }
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Keys map directly onto file names, so they are restricted to
    /// `[A-Za-z0-9_.-]` and may not start with a dot.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::StorageError(format!(
                "invalid slot key '{}'",
                key
            )));
        }
        Ok(self.directory.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl SessionSlot for FileSlot {
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // Write to a sibling temp file then rename so readers never see half a snapshot.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_slot() {
        let slot = MemorySlot::new();
        assert_eq!(slot.read("user").await.unwrap(), None);

        slot.write("user", "{}").await.unwrap();
        assert_eq!(slot.read("user").await.unwrap().as_deref(), Some("{}"));

        slot.delete("user").await.unwrap();
        slot.delete("user").await.unwrap();
        assert_eq!(slot.read("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_slot_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let slot = FileSlot::new(dir.path().join("sessions")).unwrap();
            slot.write("user", r#"{"id":1}"#).await.unwrap();
        }

        let reopened = FileSlot::new(dir.path().join("sessions")).unwrap();
        assert_eq!(
            reopened.read("user").await.unwrap().as_deref(),
            Some(r#"{"id":1}"#)
        );
        reopened.delete("user").await.unwrap();
        assert_eq!(reopened.read("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_slot_reports_binary_entry_as_corrupt() {
        let dir = tempdir().unwrap();
        let slot = FileSlot::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("user.json"), [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(slot.read("user").await, Err(StoreError::Corrupt(_))));
        slot.delete("user").await.unwrap();
        assert_eq!(slot.read("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_slot_rejects_path_keys() {
        let dir = tempdir().unwrap();
        let slot = FileSlot::new(dir.path()).unwrap();
        assert!(slot.write("../escape", "x").await.is_err());
        assert!(slot.read(".hidden").await.is_err());
        assert!(slot.write("session-1f2e", "x").await.is_ok());
    }

    #[test]
    fn test_create_slot_from_config() {
        let dir = tempdir().unwrap();
        let config = SessionConfig {
            backend: SlotBackend::File,
            directory: dir.path().join("nested/sessions"),
            ..Default::default()
        };
        create_slot(&config).unwrap();
        assert!(dir.path().join("nested/sessions").is_dir());
    }
}
