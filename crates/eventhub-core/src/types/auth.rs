//! Request and response payloads of the authentication endpoints.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::identity::Identity;
use super::role::Role;

/// Body of `POST /user/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Plain-text password, sent over TLS.
    pub password: String,
}

impl Credentials {
    /// Build a credentials pair.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful response of `POST /user/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginGrant {
    /// Opaque bearer credential.
    pub token: String,
    /// The authenticated user.
    pub user: Identity,
}

/// Multipart form sent to `POST /user/register`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationForm {
    /// Display name.
    pub full_name: String,
    /// Login email.
    pub email: String,
    /// Phone number.
    pub contact_number: String,
    /// Chosen password.
    pub password: String,
    /// Requested role.
    pub role: Role,
    /// Roll number, expected for students.
    pub student_id: Option<String>,
    /// Optional profile picture uploaded alongside the form.
    pub avatar: Option<PathBuf>,
}

/// Response body of `POST /user/register`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    /// Whether the server accepted the registration.
    #[serde(default)]
    pub success: bool,
    /// Server message shown to the user.
    #[serde(default)]
    pub message: String,
}
