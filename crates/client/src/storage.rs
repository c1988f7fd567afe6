//! Persistent key-value storage seam.
//!
//! The host application owns durable storage (keychain, shared
//! preferences, files); the SDK only needs "key to serialized value",
//! durable and per-key atomic. [`MemoryKeyValueStore`] backs tests and
//! hosts that accept credential loss across restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// A failure in the host-provided storage backend.
#[derive(Debug, Error)]
#[error("storage backend: {0}")]
pub struct StorageError(pub String);

/// Durable, async, per-key-atomic string storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every listed key. Missing keys are not an error.
    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError>;
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryKeyValueStore::new();
        store.set("a", "1").await.expect("set");
        store.set("b", "2").await.expect("set");

        assert_eq!(store.get("a").await.expect("get"), Some("1".to_string()));

        store
            .remove_many(&["a".to_string(), "missing".to_string()])
            .await
            .expect("remove");
        assert_eq!(store.get("a").await.expect("get"), None);
        assert_eq!(store.get("b").await.expect("get"), Some("2".to_string()));
    }
}
