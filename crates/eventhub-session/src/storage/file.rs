//! JSON-file credential store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;
use eventhub_core::traits::{CredentialStore, StorageKey};

/// Credential store persisted as a single JSON object on disk.
///
/// The file maps storage key names (`authToken`, `user`) to strings.
/// Writes go through a temporary file and a rename so a crash never leaves
/// a half-written document behind.
#[derive(Debug)]
pub struct FileCredentialStore {
    /// Path of the JSON document.
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Create a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing file is an empty document; an
    /// unparseable one is a serialization error.
    async fn load(&self) -> AppResult<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read credentials: {}", self.path.display()),
                    e,
                ));
            }
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Corrupt credentials file: {}", self.path.display()),
                e,
            )
        })
    }

    /// Load the document for modification; a corrupt document is replaced.
    async fn load_for_update(&self) -> AppResult<BTreeMap<String, String>> {
        match self.load().await {
            Err(e) if e.kind == ErrorKind::Serialization => Ok(BTreeMap::new()),
            other => other,
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to remove credentials: {}", self.path.display()),
                    e,
                )),
            };
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to create directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let document = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &document).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write credentials: {}", tmp.display()),
                e,
            )
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace credentials: {}", self.path.display()),
                e,
            )
        })?;

        debug!(path = %self.path.display(), keys = entries.len(), "Saved credentials");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: StorageKey) -> AppResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key.as_str()))
    }

    async fn set(&self, key: StorageKey, value: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_for_update().await?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove(&self, key: StorageKey) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_for_update().await?;
        if entries.remove(key.as_str()).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.save(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("nested/session.json"));

        assert_eq!(store.get(StorageKey::AuthToken).await.expect("get"), None);

        store.set(StorageKey::AuthToken, "t1").await.expect("set");
        store.set(StorageKey::User, "{\"id\":\"1\"}").await.expect("set");
        assert_eq!(
            store.get(StorageKey::AuthToken).await.expect("get").as_deref(),
            Some("t1")
        );

        store.remove(StorageKey::AuthToken).await.expect("remove");
        assert_eq!(store.get(StorageKey::AuthToken).await.expect("get"), None);
        assert!(store.get(StorageKey::User).await.expect("get").is_some());

        store.remove(StorageKey::User).await.expect("remove");
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        FileCredentialStore::new(&path)
            .set(StorageKey::AuthToken, "t2")
            .await
            .expect("set");

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(
            reopened.get(StorageKey::AuthToken).await.expect("get").as_deref(),
            Some("t2")
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported_then_replaced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = FileCredentialStore::new(&path);
        let err = store.get(StorageKey::User).await.expect_err("corrupt");
        assert_eq!(err.kind, ErrorKind::Serialization);

        store.remove(StorageKey::User).await.expect("remove");
        assert_eq!(store.get(StorageKey::User).await.expect("get"), None);
    }
}
