//! The session value shared with every other component.

use std::fmt;

use serde::{Deserialize, Serialize};

use eventhub_core::types::{Identity, Role};

/// Coarse session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Persisted storage has not been read yet.
    Unknown,
    /// Nobody is signed in.
    Anonymous,
    /// A user is signed in.
    Authenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Anonymous => write!(f, "anonymous"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Current authentication state.
///
/// Token and identity only exist together, inside `Authenticated`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Persisted storage has not been read yet.
    Unknown,
    /// Nobody is signed in.
    Anonymous,
    /// A user is signed in.
    Authenticated {
        /// Opaque bearer credential.
        token: String,
        /// The signed-in user.
        identity: Identity,
    },
}

impl SessionState {
    /// Coarse status of this state.
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Unknown => SessionStatus::Unknown,
            Self::Anonymous => SessionStatus::Anonymous,
            Self::Authenticated { .. } => SessionStatus::Authenticated,
        }
    }

    /// Bearer token, when signed in.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Identity, when signed in.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }

    /// Role of the signed-in user.
    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Whether the persisted session is still being restored.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}
