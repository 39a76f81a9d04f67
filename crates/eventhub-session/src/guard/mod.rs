//! Role-based access guard consulted by the routing layer.

pub mod access;

pub use access::{AccessDecision, AccessGuard, SessionUnresolved, decide};
