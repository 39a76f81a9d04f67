//! # eventhub-api
//!
//! Typed client for the EventHub REST API.
//!
//! [`AuthClient`] serves login and registration and implements
//! [`AuthBackend`](eventhub_core::traits::AuthBackend) for the session store.
//! [`ApiClient`] covers every other endpoint and attaches the bearer token
//! from a [`TokenProvider`](eventhub_core::traits::TokenProvider) to each
//! request. Failures are mapped into [`AppError`](eventhub_core::AppError)
//! with the server's message preserved for display.

pub mod client;
pub mod error;
pub mod models;

pub use client::{ApiClient, AuthClient, HttpClient};
