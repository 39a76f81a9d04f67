//! Wire frames and the domain events they normalize into.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use eventhub_core::types::UserId;

use crate::notification::record::NotificationRecord;

/// Outbound frame carrying the channel credential.
pub const AUTH_EVENT: &str = "auth";
/// Outbound frame announcing the signed-in identity.
pub const JOIN_EVENT: &str = "join";

/// A named event and its JSON payload, as exchanged over the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFrame {
    /// Event name.
    pub event: String,
    /// Event payload.
    #[serde(default)]
    pub data: Value,
}

impl WireFrame {
    /// Build a frame.
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Handshake frame carrying the bearer token.
    pub fn auth(token: &str) -> Self {
        Self::new(AUTH_EVENT, json!({ "token": token }))
    }

    /// Join frame scoping server pushes to `user_id`.
    pub fn join(user_id: &UserId) -> Self {
        Self::new(JOIN_EVENT, json!({ "userId": user_id }))
    }
}

/// A normalized inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The server acknowledged the handshake.
    Connected,
    /// The server announced it is closing the connection.
    Disconnected {
        /// Reason given by the server.
        reason: String,
    },
    /// A notification arrived for the feed.
    Notification(NotificationRecord),
    /// An event the user follows was updated.
    EventUpdated {
        /// Event title.
        title: String,
    },
    /// One of the user's registrations was confirmed.
    RegistrationConfirmed {
        /// Title of the event registered for.
        event_title: String,
    },
    /// Channel-level error reported by the server.
    Error {
        /// Server-supplied detail.
        message: String,
    },
}

impl ChannelEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected => "connect",
            Self::Disconnected { .. } => "disconnect",
            Self::Notification(_) => "notification",
            Self::EventUpdated { .. } => "eventUpdated",
            Self::RegistrationConfirmed { .. } => "registrationConfirmed",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_frames() {
        let auth = serde_json::to_value(WireFrame::auth("t1")).expect("serialize");
        assert_eq!(auth, json!({"event": "auth", "data": {"token": "t1"}}));

        let join = serde_json::to_value(WireFrame::join(&UserId::from("1"))).expect("serialize");
        assert_eq!(join, json!({"event": "join", "data": {"userId": "1"}}));
    }

    #[test]
    fn test_missing_data_defaults_to_null() {
        let frame: WireFrame = serde_json::from_str(r#"{"event":"connect"}"#).expect("parse");
        assert_eq!(frame.data, Value::Null);
    }
}
