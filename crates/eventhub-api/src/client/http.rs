//! Shared HTTP plumbing: URL building, request execution, error mapping.

use std::path::Path;

use reqwest::multipart::Part;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use eventhub_core::config::ApiConfig;
use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;

use crate::error::{status_error, transport_error};

/// Unauthenticated HTTP client bound to the API base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid API base URL: {base_url}"),
                e,
            )
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self { http, base_url })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` with optional query pairs.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> AppResult<Url> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&joined).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, format!("Invalid URL: {joined}"), e)
        })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Start a request.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<RequestBuilder> {
        Ok(self.http.request(method, self.url(path, query)?))
    }

    /// Send a request and decode a JSON response body.
    pub async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let (label, body) = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("{label}: unexpected response body"),
                e,
            )
        })
    }

    /// Send a request and discard the response body.
    pub async fn send_empty(&self, request: RequestBuilder) -> AppResult<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder) -> AppResult<(String, Vec<u8>)> {
        let request = request
            .build()
            .map_err(|e| transport_error("build", "request", e))?;
        let method = request.method().to_string();
        let path = request.url().path().to_string();
        let label = format!("{method} {path}");

        debug!(%method, %path, "API request");
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| transport_error(&method, &path, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&method, &path, e))?
            .to_vec();

        if !status.is_success() {
            let error = status_error(&method, &path, status, &body);
            warn!(%method, %path, status = status.as_u16(), kind = %error.kind, "API request failed");
            return Err(error);
        }

        debug!(%method, %path, status = status.as_u16(), bytes = body.len(), "API response");
        Ok((label, body))
    }
}

/// Multipart part holding the contents of the file at `path`.
pub async fn file_part(path: &Path) -> AppResult<Part> {
    let contents = tokio::fs::read(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Validation,
            format!("Cannot read file: {}", path.display()),
            e,
        )
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(contents).file_name(name))
}
