//! HTTP clients: the unauthenticated auth client and the authorized API client.

pub mod api;
pub mod auth;
pub mod http;

pub use api::ApiClient;
pub use auth::AuthClient;
pub use http::HttpClient;
