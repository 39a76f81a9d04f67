//! Core traits defined in `eventhub-core` and implemented by other crates.

pub mod auth;
pub mod chime;
pub mod credentials;
pub mod notifier;

pub use auth::{AuthBackend, TokenProvider};
pub use chime::Chime;
pub use credentials::{CredentialStore, StorageKey};
pub use notifier::{Notifier, Toast, ToastAction, ToastLevel};
