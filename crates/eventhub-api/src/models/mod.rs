//! Response and request models for the EventHub REST API.
//!
//! Models keep unknown fields in an `extra` map so nothing the server sends
//! is lost when a record is printed as JSON.

pub mod attendance;
pub mod event;
pub mod profile;
pub mod registration;
pub mod review;

use serde::{Deserialize, Serialize};

pub use attendance::{AttendanceExport, AttendanceFilters, AttendanceMark, AttendanceRecord};
pub use event::{Event, EventDecision, EventFilters, EventStatus, EventSummary, NewEvent};
pub use profile::ProfileUpdate;
pub use registration::Registration;
pub use review::{Review, ReviewSubmission};

/// A related record the server may send populated or as a bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    /// Fully populated record.
    Populated(T),
    /// Only the id.
    Id(String),
}

impl<T> Ref<T> {
    /// The populated record, if the server sent one.
    pub fn populated(&self) -> Option<&T> {
        match self {
            Self::Populated(value) => Some(value),
            Self::Id(_) => None,
        }
    }
}

/// Minimal description of a person attached to another record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    /// Person id.
    #[serde(alias = "_id")]
    pub id: eventhub_core::types::UserId,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Student number, for students.
    #[serde(default)]
    pub student_id: Option<String>,
}

/// Generic `{ success, message }` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Whether the server reports success.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Server message.
    #[serde(default)]
    pub message: String,
}

fn default_success() -> bool {
    true
}
