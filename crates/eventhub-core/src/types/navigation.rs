//! Navigation targets handed to the UI layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::EventId;

/// A place in the application the UI should move to.
///
/// Components describe navigation instead of performing it, which keeps
/// them free of any routing dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationTarget {
    /// Detail page of a single event.
    EventDetail {
        /// The event to show.
        event_id: EventId,
    },
    /// The signed-in user's registration list.
    Registrations,
    /// The login page.
    Login,
    /// An arbitrary application route.
    Route {
        /// Absolute route path.
        path: String,
    },
}

impl NavigationTarget {
    /// Route path for this target.
    pub fn path(&self) -> String {
        match self {
            Self::EventDetail { event_id } => format!("/events/{event_id}"),
            Self::Registrations => "/registrations".to_string(),
            Self::Login => "/login".to_string(),
            Self::Route { path } => path.clone(),
        }
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
