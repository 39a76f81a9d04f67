//! Durable client-local storage for the login state.

use std::fmt;

use async_trait::async_trait;

use crate::result::AppResult;

/// Keys the client persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The opaque bearer token.
    AuthToken,
    /// The serialized identity JSON.
    User,
}

impl StorageKey {
    /// Name under which the value is stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthToken => "authToken",
            Self::User => "user",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String key/value storage that survives process restarts.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Read a value. Returns `None` if the key is not set.
    async fn get(&self, key: StorageKey) -> AppResult<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: StorageKey, value: &str) -> AppResult<()>;

    /// Delete a value. Removing an absent key is not an error.
    async fn remove(&self, key: StorageKey) -> AppResult<()>;
}
