//! Read-only view of the session for consumers.

use tokio::sync::watch;

use eventhub_core::traits::TokenProvider;

use super::state::{SessionState, SessionStatus};

/// Cheap, cloneable read handle on the session.
///
/// Handed to the REST client (as its bearer-token hook), the access guard
/// callers, and UI observers. Only the [`SessionStore`](super::SessionStore)
/// can change what it reports.
#[derive(Debug, Clone)]
pub struct SessionObserver {
    rx: watch::Receiver<SessionState>,
}

impl SessionObserver {
    pub(crate) fn new(rx: watch::Receiver<SessionState>) -> Self {
        Self { rx }
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Current coarse status.
    pub fn status(&self) -> SessionStatus {
        self.rx.borrow().status()
    }

    /// Whether access decisions must still wait for the persisted session.
    pub fn is_loading(&self) -> bool {
        self.rx.borrow().is_loading()
    }

    /// Wait for the next state change and return the new state.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the persisted session has been restored.
    ///
    /// If the store is dropped first, returns the last state it published.
    pub async fn resolved(&mut self) -> SessionState {
        // The guard borrows the receiver; release it before falling back.
        let settled = self
            .rx
            .wait_for(|state| !state.is_loading())
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| self.current())
    }
}

impl TokenProvider for SessionObserver {
    fn bearer_token(&self) -> Option<String> {
        self.rx.borrow().token().map(str::to_string)
    }
}
