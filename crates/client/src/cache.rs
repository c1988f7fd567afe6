//! Read-through cache with bounded staleness.
//!
//! Entries are idempotent projections of upstream state, never
//! authoritative: read/write races resolve last-write-wins. Staleness is
//! decided at read time against the injected clock; a stale entry simply
//! behaves absent and is only ever removed by an explicit clear (e.g. a
//! user-triggered refresh), never by a background sweep.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use saltbox_core::{CatalogItem, Category};

use crate::clock::Clock;

/// Values the catalog facade caches, keyed by logical resource.
#[derive(Debug, Clone)]
pub(crate) enum CacheValue {
    Item(Box<CatalogItem>),
    Items(Vec<CatalogItem>),
    Categories(Vec<Category>),
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at_millis: i64,
}

/// A TTL-bounded key-value cache.
pub(crate) struct TtlCache<T: Clone> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl_millis: i64,
    clock: std::sync::Arc<dyn Clock>,
}

impl<T: Clone> TtlCache<T> {
    pub(crate) fn new(ttl_millis: i64, clock: std::sync::Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl_millis,
            clock,
        }
    }

    /// Return the cached value iff it is still fresh.
    ///
    /// A stale entry is left in place; it merely stops being returned.
    pub(crate) async fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        let age = self.clock.now_millis() - entry.stored_at_millis;
        if age < self.ttl_millis {
            debug!(key, age_millis = age, "cache hit");
            Some(entry.value.clone())
        } else {
            debug!(key, age_millis = age, "cache entry stale");
            None
        }
    }

    /// Unconditionally overwrite `key` with a fresh timestamp.
    pub(crate) async fn set(&self, key: impl Into<String>, value: T) {
        let entry = CacheEntry {
            value,
            stored_at_millis: self.clock.now_millis(),
        };
        self.entries.write().await.insert(key.into(), entry);
    }

    /// Atomically remove the listed keys. Explicit invalidation only.
    pub(crate) async fn clear(&self, keys: &[String]) {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
    }

    /// Remove every entry.
    pub(crate) async fn clear_all(&self) {
        self.entries.write().await.clear();
    }
}
