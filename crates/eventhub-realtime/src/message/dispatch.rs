//! Typed dispatch table from inbound event names to normalizers.
//!
//! Each inbound event name maps to a pure function that turns the raw JSON
//! payload into a [`ChannelEvent`]. The table knows nothing about the
//! transport; it only sees [`WireFrame`]s.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_core::types::EventId;

use super::types::{ChannelEvent, WireFrame};
use crate::notification::record::{NotificationId, NotificationRecord, NotificationType};

/// Inputs a normalizer may not derive from the payload itself.
#[derive(Debug, Clone)]
pub struct Arrival {
    /// Arrival time, used when the payload has no timestamp.
    pub received_at: DateTime<Utc>,
    /// Id used when the payload has none.
    pub fallback_id: NotificationId,
}

impl Arrival {
    /// Arrival stamped with the current time and a fresh local id.
    pub fn now() -> Self {
        Self {
            received_at: Utc::now(),
            fallback_id: NotificationId::generate(),
        }
    }
}

/// Pure payload normalizer.
pub type Normalizer = fn(&Value, &Arrival) -> AppResult<ChannelEvent>;

/// Inbound event names and their normalizers.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    routes: HashMap<&'static str, Normalizer>,
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl DispatchTable {
    /// Empty table.
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Table for the events the EventHub server emits.
    pub fn standard() -> Self {
        Self::empty()
            .route("connect", normalize_connect)
            .route("disconnect", normalize_disconnect)
            .route("notification", normalize_notification)
            .route("eventUpdated", normalize_event_updated)
            .route("registrationConfirmed", normalize_registration_confirmed)
            .route("error", normalize_error)
    }

    /// Add or replace a route.
    pub fn route(mut self, event: &'static str, normalizer: Normalizer) -> Self {
        self.routes.insert(event, normalizer);
        self
    }

    /// Whether `event` has a route.
    pub fn handles(&self, event: &str) -> bool {
        self.routes.contains_key(event)
    }

    /// Normalize a frame.
    ///
    /// `Ok(None)` means no route exists for the event name; an error means
    /// the payload was malformed and should be dropped.
    pub fn dispatch(&self, frame: &WireFrame, arrival: &Arrival) -> AppResult<Option<ChannelEvent>> {
        match self.routes.get(frame.event.as_str()) {
            Some(normalize) => normalize(&frame.data, arrival).map(Some),
            None => Ok(None),
        }
    }
}

/// Notification payload as sent by the server.
///
/// Every field is captured loosely; an odd shape in one optional field
/// never costs the whole notification.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPayload {
    #[serde(default, alias = "_id")]
    id: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<Value>,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default)]
    event_id: Option<Value>,
}

fn payload<T: for<'de> Deserialize<'de>>(event: &str, data: &Value) -> AppResult<T> {
    T::deserialize(data)
        .map_err(|e| AppError::serialization(format!("Malformed '{event}' payload: {e}")))
}

fn server_id(raw: Option<&Value>) -> Option<NotificationId> {
    match raw? {
        Value::String(s) if !s.trim().is_empty() => Some(NotificationId::server(s.clone())),
        Value::Number(n) => Some(NotificationId::server(n.to_string())),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn text(raw: Option<&Value>) -> Option<&str> {
    raw.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

/// RFC 3339 string or epoch milliseconds.
fn timestamp(raw: Option<&Value>) -> Option<DateTime<Utc>> {
    match raw? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Plain id, or a populated event document carrying `_id`/`id`.
fn event_ref(raw: Option<&Value>) -> Option<EventId> {
    match raw? {
        Value::String(s) if !s.trim().is_empty() => Some(EventId::new(s.as_str())),
        Value::Number(n) => Some(EventId::new(n.to_string())),
        Value::Object(map) => event_ref(map.get("_id").or_else(|| map.get("id"))),
        _ => None,
    }
}

fn normalize_connect(_: &Value, _: &Arrival) -> AppResult<ChannelEvent> {
    Ok(ChannelEvent::Connected)
}

fn normalize_disconnect(data: &Value, _: &Arrival) -> AppResult<ChannelEvent> {
    let reason = match data {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("server disconnect")
            .to_string(),
        _ => "server disconnect".to_string(),
    };
    Ok(ChannelEvent::Disconnected { reason })
}

fn normalize_notification(data: &Value, arrival: &Arrival) -> AppResult<ChannelEvent> {
    let raw: NotificationPayload = payload("notification", data)?;
    let message = text(raw.message.as_ref())
        .ok_or_else(|| AppError::serialization("Notification payload has no message"))?
        .to_string();

    Ok(ChannelEvent::Notification(NotificationRecord {
        id: server_id(raw.id.as_ref()).unwrap_or_else(|| arrival.fallback_id.clone()),
        kind: NotificationType::from_wire(text(raw.kind.as_ref())),
        message,
        created_at: timestamp(raw.created_at.as_ref()).unwrap_or(arrival.received_at),
        read: false,
        event_id: event_ref(raw.event_id.as_ref()),
    }))
}

#[derive(Debug, Deserialize)]
struct EventUpdatedPayload {
    #[serde(default)]
    title: Option<String>,
}

fn normalize_event_updated(data: &Value, _: &Arrival) -> AppResult<ChannelEvent> {
    let raw: EventUpdatedPayload = payload("eventUpdated", data)?;
    let title = non_empty(raw.title)
        .ok_or_else(|| AppError::serialization("eventUpdated payload has no title"))?;
    Ok(ChannelEvent::EventUpdated { title })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationConfirmedPayload {
    #[serde(default)]
    event_title: Option<String>,
}

fn normalize_registration_confirmed(data: &Value, _: &Arrival) -> AppResult<ChannelEvent> {
    let raw: RegistrationConfirmedPayload = payload("registrationConfirmed", data)?;
    let event_title = non_empty(raw.event_title).ok_or_else(|| {
        AppError::serialization("registrationConfirmed payload has no eventTitle")
    })?;
    Ok(ChannelEvent::RegistrationConfirmed { event_title })
}

fn normalize_error(data: &Value, _: &Arrival) -> AppResult<ChannelEvent> {
    let message = match data {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| data.to_string()),
        Value::Null => "unspecified channel error".to_string(),
        other => other.to_string(),
    };
    Ok(ChannelEvent::Error { message })
}
