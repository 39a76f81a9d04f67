//! # eventhub-session
//!
//! Who is logged in, persisted across restarts.
//!
//! ## Modules
//!
//! - `session`: the session store (initialize, login, register, logout) and
//!   its observable state
//! - `storage`: durable client-local credential stores (file, memory)
//! - `guard`: the pure role-based access decision consulted by routing

pub mod guard;
pub mod session;
pub mod storage;

pub use guard::{AccessDecision, AccessGuard, SessionUnresolved, decide};
pub use session::{SessionListener, SessionObserver, SessionState, SessionStatus, SessionStore};
pub use storage::{FileCredentialStore, MemoryCredentialStore};
