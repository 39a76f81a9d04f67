//! Realtime endpoint derivation.

use tracing::warn;
use url::Url;

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;

/// Origin used when the API base URL is missing or unusable.
pub const FALLBACK_ORIGIN: &str = "http://localhost:8000";

/// Derive the channel URL from the REST base URL.
///
/// The channel lives on the API's origin (path, query and credentials
/// dropped) with `http` mapped to `ws` and `https` to `wss`, plus `path`.
pub fn channel_endpoint(base_url: &str, path: &str) -> AppResult<Url> {
    match websocket_origin(base_url) {
        Some(url) => with_path(url, path),
        None => {
            warn!(base_url, fallback = FALLBACK_ORIGIN, "Unusable API base URL for realtime channel");
            let fallback = websocket_origin(FALLBACK_ORIGIN).ok_or_else(|| {
                AppError::configuration(format!("Invalid fallback origin: {FALLBACK_ORIGIN}"))
            })?;
            with_path(fallback, path)
        }
    }
}

fn websocket_origin(base_url: &str) -> Option<Url> {
    let parsed = Url::parse(base_url.trim()).ok()?;
    parsed.host_str()?;
    let scheme = match parsed.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return None,
    };

    let mut origin = parsed;
    origin.set_scheme(scheme).ok()?;
    origin.set_username("").ok()?;
    origin.set_password(None).ok()?;
    origin.set_path("");
    origin.set_query(None);
    origin.set_fragment(None);
    Some(origin)
}

fn with_path(mut url: Url, path: &str) -> AppResult<Url> {
    let path = path.trim();
    if !path.is_empty() && !path.starts_with('/') {
        return Err(AppError::new(
            ErrorKind::Configuration,
            format!("Realtime path must start with '/': {path}"),
        ));
    }
    url.set_path(path);
    Ok(url)
}
