//! Shared domain types used across EventHub crates.

pub mod auth;
pub mod id;
pub mod identity;
pub mod navigation;
pub mod role;

pub use auth::{Credentials, LoginGrant, RegistrationForm, RegistrationReceipt};
pub use id::{EventId, RegistrationId, ReviewId, UserId};
pub use identity::Identity;
pub use navigation::NavigationTarget;
pub use role::Role;
