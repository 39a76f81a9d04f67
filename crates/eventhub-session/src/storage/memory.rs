//! In-memory credential store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use eventhub_core::result::AppResult;
use eventhub_core::traits::{CredentialStore, StorageKey};

/// Credential store backed by a shared map.
///
/// Clones share the same entries, so a clone outlives a dropped
/// [`SessionStore`](crate::SessionStore) the way a file outlives a process.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<Mutex<HashMap<StorageKey, String>>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries.
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (StorageKey, String)>,
    {
        Self {
            entries: Arc::new(Mutex::new(entries.into_iter().collect())),
        }
    }

    /// Synchronous read, for assertions.
    pub fn peek(&self, key: StorageKey) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: StorageKey) -> AppResult<Option<String>> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: StorageKey, value: &str) -> AppResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> AppResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&key);
        Ok(())
    }
}
