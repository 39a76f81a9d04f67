//! Authentication seams between the session store and the REST client.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{Credentials, LoginGrant, RegistrationForm, RegistrationReceipt};

/// The remote authentication endpoints consumed by the session store.
#[async_trait]
pub trait AuthBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Exchange credentials for a bearer token and the user's identity.
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginGrant>;

    /// Create an account. Does not sign the user in.
    async fn register(&self, form: &RegistrationForm) -> AppResult<RegistrationReceipt>;
}

/// Source of the bearer token attached to outbound requests.
pub trait TokenProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Current token, or `None` when nobody is signed in.
    fn bearer_token(&self) -> Option<String>;
}
