//! Session lifecycle: restore, login, register, logout.

pub mod observer;
pub mod state;
pub mod store;

pub use observer::SessionObserver;
pub use state::{SessionState, SessionStatus};
pub use store::{SessionListener, SessionStore};
