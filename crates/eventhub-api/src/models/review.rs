//! Event reviews.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventhub_core::types::ReviewId;

use super::event::EventSummary;
use super::{PersonSummary, Ref};

/// A review left on an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Review id.
    #[serde(alias = "_id")]
    pub id: ReviewId,
    /// Reviewed event.
    #[serde(default)]
    pub event: Option<Ref<EventSummary>>,
    /// Author.
    #[serde(default)]
    pub student: Option<Ref<PersonSummary>>,
    /// Star rating, 1 to 5.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Review text.
    #[serde(default)]
    pub content: String,
    /// Feedback category.
    #[serde(default)]
    pub category: Option<String>,
    /// When it was written.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Multipart payload for `POST /review/submit/:eventId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    /// Star rating, 1 to 5.
    pub rating: u8,
    /// Review text.
    pub content: String,
    /// Feedback category.
    pub category: String,
    /// Files attached to the review.
    pub attachments: Vec<PathBuf>,
}
