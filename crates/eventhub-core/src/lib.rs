//! # eventhub-core
//!
//! Core crate for the EventHub client. Contains the configuration schemas,
//! shared domain types (roles, identities), the seam traits implemented by
//! the other crates, and the unified error system.
//!
//! This crate has **no** internal dependencies on other EventHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
