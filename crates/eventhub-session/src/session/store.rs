//! Session store: the single source of truth for who is logged in.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;
use eventhub_core::traits::{AuthBackend, CredentialStore, Notifier, StorageKey, Toast};
use eventhub_core::types::{Credentials, Identity, RegistrationForm, RegistrationReceipt};

use super::observer::SessionObserver;
use super::state::{SessionState, SessionStatus};

const LOGIN_SUCCESS: &str = "Logged in successfully!";
const LOGIN_FALLBACK: &str = "Login failed. Please check your credentials.";
const REGISTER_FALLBACK: &str = "Registration failed. Please try again.";
const LOGOUT_SUCCESS: &str = "Logged out successfully.";

/// Reacts to the session entering or leaving the authenticated state.
///
/// Callbacks run synchronously inside the store operation that caused the
/// transition, so they must not block.
pub trait SessionListener: Send + Sync + std::fmt::Debug + 'static {
    /// A user became signed in (login or restored session).
    fn on_authenticated(&self, token: &str, identity: &Identity);

    /// The signed-in user was signed out.
    fn on_signed_out(&self);
}

/// Owns the authentication identity, token, and persisted login state.
#[derive(Debug)]
pub struct SessionStore {
    /// Remote authentication endpoints.
    backend: Arc<dyn AuthBackend>,
    /// Durable client-local storage.
    credentials: Arc<dyn CredentialStore>,
    /// Toast sink.
    notifier: Arc<dyn Notifier>,
    /// Published session state.
    state_tx: watch::Sender<SessionState>,
    /// Components torn down or started with the session.
    listeners: RwLock<Vec<Arc<dyn SessionListener>>>,
}

impl SessionStore {
    /// Create a store in the `Unknown` state. Call [`initialize`](Self::initialize)
    /// before trusting any access decision.
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        credentials: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Unknown);
        Self {
            backend,
            credentials,
            notifier,
            state_tx,
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a component that follows the session lifecycle.
    ///
    /// A listener added while a user is already signed in is started
    /// immediately.
    pub fn add_listener(&self, listener: Arc<dyn SessionListener>) {
        if let SessionState::Authenticated { token, identity } = self.state() {
            listener.on_authenticated(&token, &identity);
        }
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
    }

    /// Read handle on the session state.
    pub fn observer(&self) -> SessionObserver {
        SessionObserver::new(self.state_tx.subscribe())
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Current coarse status.
    pub fn status(&self) -> SessionStatus {
        self.state_tx.borrow().status()
    }

    /// Restore the session from persisted storage.
    ///
    /// Runs once; later calls return the already-resolved status. Partial
    /// or unparseable persisted data is cleared and yields `Anonymous`.
    pub async fn initialize(&self) -> SessionStatus {
        if self.status() != SessionStatus::Unknown {
            return self.status();
        }

        let restored = match self.read_persisted().await {
            Ok(restored) => restored,
            Err(e) if e.kind == ErrorKind::Serialization => {
                warn!(error = %e, "Persisted session is corrupt, clearing it");
                self.clear_persisted_quietly().await;
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not read persisted session");
                None
            }
        };

        match restored {
            Some((token, identity)) => {
                info!(user_id = %identity.id, role = %identity.role, "Session restored");
                self.enter_authenticated(token, identity);
            }
            None => {
                debug!("No persisted session");
                self.state_tx.send_replace(SessionState::Anonymous);
            }
        }

        self.status()
    }

    /// Sign in with email and password.
    ///
    /// On failure the session is left untouched and an error toast carries
    /// the server's message (or a generic fallback). No automatic retry.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Identity> {
        let credentials = Credentials::new(email, password);

        let grant = match self.backend.login(&credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(kind = %e.kind, error = %e, "Login failed");
                self.notifier
                    .notify(Toast::error(e.user_message(LOGIN_FALLBACK)));
                return Err(e);
            }
        };

        if grant.token.trim().is_empty() {
            let e = AppError::authentication("Login response did not contain a token");
            error!(error = %e, "Login failed");
            self.notifier.notify(Toast::error(LOGIN_FALLBACK));
            return Err(e);
        }

        if let Err(e) = self.persist(&grant.token, &grant.user).await {
            error!(error = %e, "Failed to persist session, login aborted");
            self.clear_persisted_quietly().await;
            self.notifier.notify(Toast::error(LOGIN_FALLBACK));
            return Err(e);
        }

        info!(user_id = %grant.user.id, role = %grant.user.role, "Login successful");
        self.enter_authenticated(grant.token, grant.user.clone());
        self.notifier.notify(Toast::success(LOGIN_SUCCESS));

        Ok(grant.user)
    }

    /// Create an account. Never changes the session: registering does not
    /// sign the user in.
    pub async fn register(&self, form: &RegistrationForm) -> AppResult<RegistrationReceipt> {
        let result = self.backend.register(form).await.and_then(|receipt| {
            if receipt.success {
                Ok(receipt)
            } else {
                Err(AppError::validation("Registration rejected")
                    .with_server_message(receipt.message))
            }
        });

        match result {
            Ok(receipt) => {
                info!(email = %form.email, role = %form.role, "Registration accepted");
                let message = if receipt.message.is_empty() {
                    "Registration successful."
                } else {
                    receipt.message.as_str()
                };
                self.notifier.notify(Toast::success(message));
                Ok(receipt)
            }
            Err(e) => {
                warn!(kind = %e.kind, error = %e, "Registration failed");
                self.notifier
                    .notify(Toast::error(e.user_message(REGISTER_FALLBACK)));
                Err(e)
            }
        }
    }

    /// Sign out.
    ///
    /// Listeners are torn down before this returns. Without a signed-in
    /// user this is a no-op.
    pub async fn logout(&self) -> AppResult<()> {
        let was_authenticated = self.state_tx.send_if_modified(|state| {
            if state.is_authenticated() {
                *state = SessionState::Anonymous;
                true
            } else {
                false
            }
        });

        if !was_authenticated {
            debug!("Logout without a session, nothing to do");
            return Ok(());
        }

        for listener in self.listeners_snapshot() {
            listener.on_signed_out();
        }

        info!("Logged out");
        self.notifier.notify(Toast::info(LOGOUT_SUCCESS));

        self.clear_persisted().await
    }

    fn enter_authenticated(&self, token: String, identity: Identity) {
        self.state_tx.send_replace(SessionState::Authenticated {
            token: token.clone(),
            identity: identity.clone(),
        });
        for listener in self.listeners_snapshot() {
            listener.on_authenticated(&token, &identity);
        }
    }

    fn listeners_snapshot(&self) -> Vec<Arc<dyn SessionListener>> {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Read token + identity. Both absent is `Ok(None)`; anything partial
    /// or unparseable is a serialization error.
    async fn read_persisted(&self) -> AppResult<Option<(String, Identity)>> {
        let token = self.credentials.get(StorageKey::AuthToken).await?;
        let user = self.credentials.get(StorageKey::User).await?;

        match (token, user) {
            (None, None) => Ok(None),
            (Some(token), Some(user)) => {
                if token.trim().is_empty() {
                    return Err(AppError::serialization("Persisted token is empty"));
                }
                let identity: Identity = serde_json::from_str(&user)?;
                Ok(Some((token, identity)))
            }
            (token, _) => Err(AppError::serialization(format!(
                "Partial persisted session (token present: {})",
                token.is_some()
            ))),
        }
    }

    async fn persist(&self, token: &str, identity: &Identity) -> AppResult<()> {
        let user = serde_json::to_string(identity)?;
        self.credentials.set(StorageKey::AuthToken, token).await?;
        self.credentials.set(StorageKey::User, &user).await
    }

    async fn clear_persisted(&self) -> AppResult<()> {
        let token = self.credentials.remove(StorageKey::AuthToken).await;
        let user = self.credentials.remove(StorageKey::User).await;
        token.and(user)
    }

    async fn clear_persisted_quietly(&self) {
        if let Err(e) = self.clear_persisted().await {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }
}
