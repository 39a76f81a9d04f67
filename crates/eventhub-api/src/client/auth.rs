//! Authentication endpoints. These run before a token exists.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::Form;
use tracing::info;

use eventhub_core::result::AppResult;
use eventhub_core::traits::AuthBackend;
use eventhub_core::types::{Credentials, LoginGrant, RegistrationForm, RegistrationReceipt};

use super::http::{HttpClient, file_part};

/// Client for `/user/login` and `/user/register`.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    /// Wrap an HTTP client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    async fn registration_form(form: &RegistrationForm) -> AppResult<Form> {
        let mut multipart = Form::new()
            .text("fullName", form.full_name.clone())
            .text("email", form.email.clone())
            .text("contactNumber", form.contact_number.clone())
            .text("password", form.password.clone())
            .text("role", form.role.as_str().to_string());
        if let Some(student_id) = &form.student_id {
            multipart = multipart.text("studentId", student_id.clone());
        }
        if let Some(avatar) = &form.avatar {
            multipart = multipart.part("file", file_part(avatar).await?);
        }
        Ok(multipart)
    }
}

#[async_trait]
impl AuthBackend for AuthClient {
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginGrant> {
        let request = self
            .http
            .request(Method::POST, "/user/login", &[])?
            .json(credentials);
        self.http.send(request).await
    }

    async fn register(&self, form: &RegistrationForm) -> AppResult<RegistrationReceipt> {
        let multipart = Self::registration_form(form).await?;
        let request = self
            .http
            .request(Method::POST, "/user/register", &[])?
            .multipart(multipart);
        let receipt: RegistrationReceipt = self.http.send(request).await?;
        info!(email = %form.email, success = receipt.success, "Registration submitted");
        Ok(receipt)
    }
}
