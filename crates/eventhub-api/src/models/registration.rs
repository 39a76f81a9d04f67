//! Event registrations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventhub_core::types::RegistrationId;

use super::event::EventSummary;
use super::{PersonSummary, Ref};

/// A student's registration for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Registration id.
    #[serde(alias = "_id")]
    pub id: RegistrationId,
    /// The event registered for.
    #[serde(default)]
    pub event: Option<Ref<EventSummary>>,
    /// The registered student.
    #[serde(default)]
    pub student: Option<Ref<PersonSummary>>,
    /// When the registration was made.
    #[serde(default)]
    pub registration_date: Option<DateTime<Utc>>,
    /// Registration status, when the server tracks one.
    #[serde(default)]
    pub status: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Registration {
    /// Title of the event, if populated.
    pub fn event_title(&self) -> Option<&str> {
        self.event
            .as_ref()
            .and_then(Ref::populated)
            .map(|e| e.title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_populated_and_bare_references() {
        let populated: Registration = serde_json::from_value(json!({
            "_id": "r1",
            "event": {"_id": "e5", "title": "Hackathon", "startDate": "2026-04-01T09:00:00Z"},
            "student": {"_id": "1", "fullName": "Asha Rao", "studentId": "CS-042"}
        }))
        .expect("populated");
        assert_eq!(populated.event_title(), Some("Hackathon"));

        let bare: Registration =
            serde_json::from_value(json!({"_id": "r2", "event": "e5"})).expect("bare");
        assert_eq!(bare.event, Some(Ref::Id("e5".into())));
        assert_eq!(bare.event_title(), None);
    }
}
