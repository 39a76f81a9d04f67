//! Mapping of HTTP failures into the application error taxonomy.

use reqwest::StatusCode;
use serde::Deserialize;

use eventhub_core::error::{AppError, ErrorKind};

/// Error body the API returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Extract the server-supplied message from an error body, if any.
pub fn server_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}

/// Error kind for a non-success status.
pub fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status.as_u16() {
        401 => ErrorKind::Authentication,
        403 => ErrorKind::Authorization,
        404 => ErrorKind::NotFound,
        409 => ErrorKind::Conflict,
        400 | 422 => ErrorKind::Validation,
        408 | 429 => ErrorKind::Transport,
        500..=599 => ErrorKind::ExternalService,
        _ => ErrorKind::Internal,
    }
}

/// Build the error for a non-success response.
pub fn status_error(method: &str, path: &str, status: StatusCode, body: &[u8]) -> AppError {
    let error = AppError::new(
        kind_for_status(status),
        format!("{method} {path} returned {status}"),
    );
    match server_message(body) {
        Some(message) => error.with_server_message(message),
        None => error,
    }
}

/// Map a transport-level `reqwest` failure.
pub fn transport_error(method: &str, path: &str, e: reqwest::Error) -> AppError {
    let kind = if e.is_decode() {
        ErrorKind::Serialization
    } else if e.is_builder() {
        ErrorKind::Configuration
    } else {
        ErrorKind::Transport
    };
    let reason = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    AppError::with_source(kind, format!("{method} {path} {reason}"), e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).expect("valid status")
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(kind_for_status(status(401)), ErrorKind::Authentication);
        assert_eq!(kind_for_status(status(403)), ErrorKind::Authorization);
        assert_eq!(kind_for_status(status(404)), ErrorKind::NotFound);
        assert_eq!(kind_for_status(status(409)), ErrorKind::Conflict);
        assert_eq!(kind_for_status(status(422)), ErrorKind::Validation);
        assert_eq!(kind_for_status(status(503)), ErrorKind::ExternalService);
        assert_eq!(kind_for_status(status(418)), ErrorKind::Internal);
    }

    #[test]
    fn test_server_message_is_attached() {
        let err = status_error(
            "POST",
            "/user/login",
            status(401),
            br#"{"success":false,"message":"Invalid credentials"}"#,
        );
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.user_message("fallback"), "Invalid credentials");
    }

    #[test]
    fn test_unparseable_body_uses_fallback() {
        let err = status_error("GET", "/event/all", status(502), b"<html>Bad gateway</html>");
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(err.user_message("fallback"), "fallback");

        let blank = status_error("GET", "/event/all", status(400), br#"{"message":"  "}"#);
        assert!(blank.server_message.is_none());
    }
}
