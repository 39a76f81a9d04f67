//! Integration tests for the session store lifecycle.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;
use eventhub_core::traits::{
    AuthBackend, CredentialStore, Notifier, StorageKey, Toast, ToastLevel, TokenProvider,
};
use eventhub_core::types::{
    Credentials, Identity, LoginGrant, RegistrationForm, RegistrationReceipt, Role,
};
use eventhub_session::{
    MemoryCredentialStore, SessionListener, SessionState, SessionStatus, SessionStore,
};

/// Scripted authentication backend.
#[derive(Debug, Default)]
struct MockBackend {
    login_result: Mutex<Option<AppResult<LoginGrant>>>,
    register_result: Mutex<Option<AppResult<RegistrationReceipt>>>,
    login_calls: Mutex<Vec<String>>,
}

impl MockBackend {
    fn granting(token: &str, identity: Identity) -> Self {
        let backend = Self::default();
        *backend.login_result.lock().unwrap() = Some(Ok(LoginGrant {
            token: token.to_string(),
            user: identity,
        }));
        backend
    }

    fn failing(err: AppError) -> Self {
        let backend = Self::default();
        *backend.login_result.lock().unwrap() = Some(Err(err));
        backend
    }
}

#[async_trait]
impl AuthBackend for MockBackend {
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginGrant> {
        self.login_calls
            .lock()
            .unwrap()
            .push(credentials.email.clone());
        self.login_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(AppError::transport("no scripted response")))
    }

    async fn register(&self, _form: &RegistrationForm) -> AppResult<RegistrationReceipt> {
        self.register_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(AppError::transport("no scripted response")))
    }
}

#[derive(Debug, Default)]
struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    fn last(&self) -> Option<Toast> {
        self.toasts.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

#[derive(Debug, Default)]
struct RecordingListener {
    events: Mutex<Vec<String>>,
}

impl SessionListener for RecordingListener {
    fn on_authenticated(&self, token: &str, identity: &Identity) {
        self.events
            .lock()
            .unwrap()
            .push(format!("auth:{token}:{}", identity.id));
    }

    fn on_signed_out(&self) {
        self.events.lock().unwrap().push("out".to_string());
    }
}

fn student() -> Identity {
    Identity::new("1", "Asha Rao", "a@b.com", Role::Student)
}

fn store_with(
    backend: MockBackend,
    storage: MemoryCredentialStore,
) -> (SessionStore, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let store = SessionStore::new(Arc::new(backend), Arc::new(storage), notifier.clone());
    (store, notifier)
}

fn registration() -> RegistrationForm {
    RegistrationForm {
        full_name: "Asha Rao".to_string(),
        email: "a@b.com".to_string(),
        contact_number: "9999999999".to_string(),
        password: "secret".to_string(),
        role: Role::Student,
        student_id: Some("CS-042".to_string()),
        avatar: None,
    }
}

#[tokio::test]
async fn test_initialize_without_persisted_state_is_anonymous() {
    let (store, _) = store_with(MockBackend::default(), MemoryCredentialStore::new());
    assert_eq!(store.status(), SessionStatus::Unknown);
    assert!(store.observer().is_loading());

    assert_eq!(store.initialize().await, SessionStatus::Anonymous);
    assert!(!store.observer().is_loading());
}

#[tokio::test]
async fn test_login_persists_and_authenticates() {
    let storage = MemoryCredentialStore::new();
    let (store, notifier) = store_with(MockBackend::granting("t1", student()), storage.clone());
    let listener = Arc::new(RecordingListener::default());
    store.add_listener(listener.clone());
    store.initialize().await;

    let identity = store.login("a@b.com", "x").await.expect("login");

    assert_eq!(identity, student());
    assert_eq!(store.status(), SessionStatus::Authenticated);
    assert_eq!(store.state().token(), Some("t1"));
    assert_eq!(storage.peek(StorageKey::AuthToken).as_deref(), Some("t1"));
    let persisted: Identity =
        serde_json::from_str(&storage.peek(StorageKey::User).expect("user")).expect("json");
    assert_eq!(persisted, student());

    assert_eq!(*listener.events.lock().unwrap(), vec!["auth:t1:1".to_string()]);
    assert_eq!(store.observer().bearer_token().as_deref(), Some("t1"));

    let toast = notifier.last().expect("toast");
    assert_eq!(toast.level, ToastLevel::Success);
    assert_eq!(toast.message, "Logged in successfully!");
}

#[tokio::test]
async fn test_login_failure_leaves_session_untouched() {
    let storage = MemoryCredentialStore::new();
    let err = AppError::authentication("HTTP 401").with_server_message("Invalid credentials");
    let (store, notifier) = store_with(MockBackend::failing(err), storage.clone());
    store.initialize().await;

    let result = store.login("a@b.com", "wrong").await;

    assert_eq!(result.expect_err("should fail").kind, ErrorKind::Authentication);
    assert_eq!(store.status(), SessionStatus::Anonymous);
    assert!(storage.is_empty());
    let toast = notifier.last().expect("toast");
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "Invalid credentials");
}

#[tokio::test]
async fn test_login_transport_failure_uses_fallback_message() {
    let (store, notifier) = store_with(
        MockBackend::failing(AppError::transport("connection refused")),
        MemoryCredentialStore::new(),
    );
    store.initialize().await;

    assert!(store.login("a@b.com", "x").await.is_err());
    assert_eq!(
        notifier.last().expect("toast").message,
        "Login failed. Please check your credentials."
    );
}

#[tokio::test]
async fn test_restart_restores_identity() {
    let storage = MemoryCredentialStore::new();
    {
        let (store, _) = store_with(MockBackend::granting("t1", student()), storage.clone());
        store.initialize().await;
        store.login("a@b.com", "x").await.expect("login");
    }

    let (restarted, _) = store_with(MockBackend::default(), storage.clone());
    let listener = Arc::new(RecordingListener::default());
    restarted.add_listener(listener.clone());

    assert_eq!(restarted.initialize().await, SessionStatus::Authenticated);
    assert_eq!(restarted.state().identity(), Some(&student()));
    assert_eq!(restarted.state().token(), Some("t1"));
    assert_eq!(*listener.events.lock().unwrap(), vec!["auth:t1:1".to_string()]);
}

#[tokio::test]
async fn test_partial_persisted_state_is_cleared() {
    let storage = MemoryCredentialStore::with_entries([(
        StorageKey::User,
        serde_json::to_string(&student()).unwrap(),
    )]);
    let (store, _) = store_with(MockBackend::default(), storage.clone());

    assert_eq!(store.initialize().await, SessionStatus::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_corrupt_user_json_is_cleared() {
    let storage = MemoryCredentialStore::with_entries([
        (StorageKey::AuthToken, "t1".to_string()),
        (StorageKey::User, "{\"id\": ".to_string()),
    ]);
    let (store, _) = store_with(MockBackend::default(), storage.clone());

    assert_eq!(store.initialize().await, SessionStatus::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_initialize_runs_once() {
    let storage = MemoryCredentialStore::new();
    let (store, _) = store_with(MockBackend::default(), storage.clone());
    assert_eq!(store.initialize().await, SessionStatus::Anonymous);

    storage
        .set(StorageKey::AuthToken, "late")
        .await
        .expect("set");
    storage
        .set(StorageKey::User, &serde_json::to_string(&student()).unwrap())
        .await
        .expect("set");

    assert_eq!(store.initialize().await, SessionStatus::Anonymous);
}

#[tokio::test]
async fn test_logout_clears_everything_and_notifies() {
    let storage = MemoryCredentialStore::new();
    let (store, notifier) = store_with(MockBackend::granting("t1", student()), storage.clone());
    let listener = Arc::new(RecordingListener::default());
    store.add_listener(listener.clone());
    store.initialize().await;
    store.login("a@b.com", "x").await.expect("login");

    store.logout().await.expect("logout");

    assert_eq!(store.state(), SessionState::Anonymous);
    assert!(storage.is_empty());
    assert_eq!(
        *listener.events.lock().unwrap(),
        vec!["auth:t1:1".to_string(), "out".to_string()]
    );
    assert_eq!(notifier.last().expect("toast").message, "Logged out successfully.");
    assert!(store.observer().bearer_token().is_none());
}

#[tokio::test]
async fn test_logout_without_session_is_noop() {
    let (store, notifier) = store_with(MockBackend::default(), MemoryCredentialStore::new());
    let listener = Arc::new(RecordingListener::default());
    store.add_listener(listener.clone());
    store.initialize().await;

    store.logout().await.expect("first logout");
    store.logout().await.expect("second logout");

    assert_eq!(store.status(), SessionStatus::Anonymous);
    assert!(listener.events.lock().unwrap().is_empty());
    assert!(notifier.last().is_none());
}

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let backend = MockBackend::default();
    *backend.register_result.lock().unwrap() = Some(Ok(RegistrationReceipt {
        success: true,
        message: "Registered! Please log in.".to_string(),
    }));
    let (store, notifier) = store_with(backend, MemoryCredentialStore::new());
    store.initialize().await;

    let receipt = store.register(&registration()).await.expect("register");

    assert!(receipt.success);
    assert_eq!(store.status(), SessionStatus::Anonymous);
    assert_eq!(
        notifier.last().expect("toast").message,
        "Registered! Please log in."
    );
}

#[tokio::test]
async fn test_register_duplicate_email_surfaces_server_message() {
    let backend = MockBackend::default();
    *backend.register_result.lock().unwrap() = Some(Err(
        AppError::conflict("HTTP 409").with_server_message("Email already registered")
    ));
    let (store, notifier) = store_with(backend, MemoryCredentialStore::new());
    store.initialize().await;

    let err = store.register(&registration()).await.expect_err("duplicate");

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(store.status(), SessionStatus::Anonymous);
    let toast = notifier.last().expect("toast");
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "Email already registered");
}

#[tokio::test]
async fn test_observer_sees_transitions() {
    let (store, _) = store_with(
        MockBackend::granting("t1", student()),
        MemoryCredentialStore::new(),
    );
    let mut observer = store.observer();

    store.initialize().await;
    assert_eq!(observer.resolved().await.status(), SessionStatus::Anonymous);

    store.login("a@b.com", "x").await.expect("login");
    let next = observer.changed().await.expect("change");
    assert!(next.is_authenticated());
}

#[tokio::test]
async fn test_observer_resolves_after_concurrent_initialize() {
    let (store, _) = store_with(
        MockBackend::default(),
        MemoryCredentialStore::with_entries([
            (StorageKey::AuthToken, "t1".to_string()),
            (
                StorageKey::User,
                serde_json::to_string(&student()).expect("encode"),
            ),
        ]),
    );
    let mut observer = store.observer();
    assert!(observer.is_loading());

    let waiter = tokio::spawn(async move { observer.resolved().await });
    store.initialize().await;

    let state = waiter.await.expect("join");
    assert!(state.is_authenticated());
    assert_eq!(state.token(), Some("t1"));
}

#[tokio::test]
async fn test_observer_resolved_after_store_dropped_returns_last_state() {
    let (store, _) = store_with(MockBackend::default(), MemoryCredentialStore::new());
    let mut observer = store.observer();
    drop(store);

    let state = observer.resolved().await;
    assert_eq!(state.status(), SessionStatus::Unknown);
}
