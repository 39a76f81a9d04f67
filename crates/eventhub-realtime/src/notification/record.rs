//! Notification records held by the feed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use eventhub_core::error::AppError;
use eventhub_core::types::{EventId, NavigationTarget};

/// Identifier of a notification record.
///
/// Records carry the server's id when the payload has one; otherwise the
/// client assigns a time-ordered local id. Uniqueness is per feed instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum NotificationId {
    /// Id supplied by the server payload.
    ServerAssigned(String),
    /// Fallback id generated on arrival.
    LocallyGenerated(String),
}

impl NotificationId {
    /// Wrap a server-supplied id.
    pub fn server(id: impl Into<String>) -> Self {
        Self::ServerAssigned(id.into())
    }

    /// Generate a fresh local id. UUIDv7 keeps ids ordered by arrival time.
    pub fn generate() -> Self {
        Self::LocallyGenerated(Uuid::now_v7().to_string())
    }

    /// The raw id string regardless of origin.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ServerAssigned(id) | Self::LocallyGenerated(id) => id,
        }
    }

    /// Whether the id came from the server.
    pub fn is_server_assigned(&self) -> bool {
        matches!(self, Self::ServerAssigned(_))
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Something happened to an event.
    Event,
    /// Something happened to one of the user's registrations.
    Registration,
    /// Urgent notice.
    Alert,
    /// Anything else.
    Generic,
}

impl NotificationType {
    /// All types, in display order.
    pub const ALL: [NotificationType; 4] = [
        NotificationType::Event,
        NotificationType::Registration,
        NotificationType::Alert,
        NotificationType::Generic,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Registration => "registration",
            Self::Alert => "alert",
            Self::Generic => "generic",
        }
    }

    /// Lenient mapping used for inbound payloads: absent or unknown types
    /// become [`Generic`](Self::Generic).
    pub fn from_wire(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::Generic)
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event" => Ok(Self::Event),
            "registration" => Ok(Self::Registration),
            "alert" => Ok(Self::Alert),
            "generic" => Ok(Self::Generic),
            other => Err(AppError::validation(format!(
                "Unknown notification type '{other}'"
            ))),
        }
    }
}

/// A single entry in the notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Record id.
    pub id: NotificationId,
    /// Category.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Display text.
    pub message: String,
    /// When the server created it, or when it arrived.
    pub created_at: DateTime<Utc>,
    /// Whether the user has seen it.
    pub read: bool,
    /// Related event, used for click navigation.
    pub event_id: Option<EventId>,
}

impl NotificationRecord {
    /// Build an unread record.
    pub fn new(
        id: NotificationId,
        kind: NotificationType,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            message: message.into(),
            created_at,
            read: false,
            event_id: None,
        }
    }

    /// Attach the related event.
    pub fn with_event(mut self, event_id: impl Into<EventId>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// Where clicking this record leads, if anywhere.
    ///
    /// An `event` record without an event id has nowhere to go.
    pub fn navigation_target(&self) -> Option<NavigationTarget> {
        match self.kind {
            NotificationType::Event => self
                .event_id
                .clone()
                .map(|event_id| NavigationTarget::EventDetail { event_id }),
            NotificationType::Registration => Some(NavigationTarget::Registrations),
            NotificationType::Alert | NotificationType::Generic => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_targets() {
        let now = Utc::now();
        let event = NotificationRecord::new(
            NotificationId::server("n1"),
            NotificationType::Event,
            "Event updated",
            now,
        )
        .with_event("e5");
        assert_eq!(
            event.navigation_target(),
            Some(NavigationTarget::EventDetail {
                event_id: EventId::from("e5")
            })
        );

        let orphan =
            NotificationRecord::new(NotificationId::generate(), NotificationType::Event, "x", now);
        assert_eq!(orphan.navigation_target(), None);

        let registration = NotificationRecord::new(
            NotificationId::generate(),
            NotificationType::Registration,
            "Registered",
            now,
        );
        assert_eq!(
            registration.navigation_target(),
            Some(NavigationTarget::Registrations)
        );

        let alert =
            NotificationRecord::new(NotificationId::generate(), NotificationType::Alert, "!", now);
        assert_eq!(alert.navigation_target(), None);
    }

    #[test]
    fn test_type_from_wire_is_lenient() {
        assert_eq!(NotificationType::from_wire(Some("EVENT")), NotificationType::Event);
        assert_eq!(NotificationType::from_wire(Some("reminder")), NotificationType::Generic);
        assert_eq!(NotificationType::from_wire(None), NotificationType::Generic);
        assert!("reminder".parse::<NotificationType>().is_err());
    }

    #[test]
    fn test_local_ids_are_distinct() {
        let a = NotificationId::generate();
        let b = NotificationId::generate();
        assert_ne!(a, b);
        assert!(!a.is_server_assigned());
    }

    #[test]
    fn test_id_serializes_tagged() {
        let json = serde_json::to_value(NotificationId::server("n1")).expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "server_assigned", "id": "n1"}));
    }
}
