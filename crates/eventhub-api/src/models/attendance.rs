//! Attendance marking and export.

use serde::{Deserialize, Serialize};

use eventhub_core::types::{EventId, UserId};

use super::event::EventSummary;
use super::{PersonSummary, Ref};

/// Body of `POST /attendance/mark`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    /// Student being marked.
    pub student_id: UserId,
    /// Event attended.
    pub event_id: EventId,
    /// Present or absent.
    pub is_present: bool,
}

/// One attendance entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Student.
    #[serde(default)]
    pub student: Option<Ref<PersonSummary>>,
    /// Event.
    #[serde(default)]
    pub event: Option<Ref<EventSummary>>,
    /// Whether the student attended.
    #[serde(default)]
    pub is_present: bool,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Query filters for `GET /attendance/download`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilters {
    /// Restrict to one event.
    pub event_id: Option<EventId>,
}

impl AttendanceFilters {
    /// Query pairs for the non-empty filters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        self.event_id
            .iter()
            .map(|id| ("eventId", id.to_string()))
            .collect()
    }
}

/// Attendance export as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceExport {
    /// Export rows, in the server's shape.
    #[serde(default)]
    pub data: serde_json::Value,
}
