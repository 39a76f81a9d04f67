//! Event records and event mutations.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventhub_core::error::AppError;
use eventhub_core::types::EventId;

/// Approval and lifecycle status of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventStatus {
    /// Awaiting approval.
    Pending,
    /// Approved by faculty.
    Approved,
    /// Rejected by faculty.
    Rejected,
    /// Running now.
    Active,
    /// Finished.
    Completed,
    /// A status this client does not know.
    Other(String),
}

impl EventStatus {
    /// Wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for EventStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::Other(s),
        }
    }
}

impl From<EventStatus> for String {
    fn from(status: EventStatus) -> Self {
        status.as_str().to_string()
    }
}

impl FromStr for EventStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from(s.trim().to_string()) {
            Self::Other(other) => Err(AppError::validation(format!(
                "Unknown event status '{other}'"
            ))),
            known => Ok(known),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as listed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event id.
    #[serde(alias = "_id")]
    pub id: EventId,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Status.
    #[serde(default)]
    pub status: Option<EventStatus>,
    /// Category.
    #[serde(default)]
    pub category: Option<String>,
    /// Location.
    #[serde(default, alias = "venue")]
    pub location: Option<String>,
    /// Start time.
    #[serde(default, alias = "date")]
    pub start_date: Option<DateTime<Utc>>,
    /// End time.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Reason given when the event was rejected.
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Event fields embedded in registrations and reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    /// Event id.
    #[serde(alias = "_id")]
    pub id: EventId,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Start time.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
}

/// Query filters for `GET /event/all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilters {
    /// Only events with this status.
    pub status: Option<EventStatus>,
    /// Only events in this category.
    pub category: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
}

impl EventFilters {
    /// Query pairs for the non-empty filters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = &self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

/// Multipart payload for `POST /event/create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Date, as the server expects it (ISO 8601).
    pub date: String,
    /// Location.
    pub location: String,
    /// Optional poster image.
    pub poster: Option<PathBuf>,
}

/// Body of `PUT /event/approve-reject/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDecision {
    /// `approved` or `rejected`.
    pub status: EventStatus,
    /// Reason shown to the coordinator on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl EventDecision {
    /// Approve the event.
    pub fn approve() -> Self {
        Self {
            status: EventStatus::Approved,
            rejection_reason: None,
        }
    }

    /// Reject the event with a reason.
    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            status: EventStatus::Rejected,
            rejection_reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_event_from_server_shape() {
        let event: Event = serde_json::from_value(json!({
            "_id": "65f1",
            "title": "Hackathon",
            "status": "approved",
            "startDate": "2026-04-01T09:00:00Z",
            "coordinator": {"_id": "c1"}
        }))
        .expect("event");

        assert_eq!(event.id, EventId::from("65f1"));
        assert_eq!(event.status, Some(EventStatus::Approved));
        assert!(event.start_date.is_some());
        assert!(event.extra.contains_key("coordinator"));
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let status: EventStatus = serde_json::from_value(json!("archived")).expect("status");
        assert_eq!(status, EventStatus::Other("archived".into()));
        assert_eq!(serde_json::to_value(&status).expect("serialize"), json!("archived"));
        assert!("archived".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_decision_body() {
        assert_eq!(
            serde_json::to_value(EventDecision::reject("Clashes with exams")).expect("json"),
            json!({"status": "rejected", "rejectionReason": "Clashes with exams"})
        );
        assert_eq!(
            serde_json::to_value(EventDecision::approve()).expect("json"),
            json!({"status": "approved"})
        );
    }

    #[test]
    fn test_filters_skip_empty() {
        let filters = EventFilters {
            status: Some(EventStatus::Pending),
            search: Some("robotics".into()),
            ..Default::default()
        };
        assert_eq!(
            filters.to_query(),
            vec![("status", "pending".to_string()), ("search", "robotics".to_string())]
        );
    }
}
