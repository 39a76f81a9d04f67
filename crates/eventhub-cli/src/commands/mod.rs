//! CLI command definitions and dispatch.

pub mod access;
pub mod attendance;
pub mod auth;
pub mod events;
pub mod notifications;
pub mod profile;
pub mod registrations;
pub mod reviews;
pub mod watch;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use eventhub_api::{ApiClient, AuthClient, HttpClient};
use eventhub_core::config::AppConfig;
use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_core::traits::Chime;
use eventhub_core::types::{Identity, Role};
use eventhub_realtime::{ChannelManager, SilentChime, TerminalBell, WsTransport, channel_endpoint};
use eventhub_session::{AccessGuard, FileCredentialStore, SessionStore};

use crate::console::ConsoleNotifier;
use crate::output::OutputFormat;

/// EventHub: campus event management from the terminal
#[derive(Debug, Parser)]
#[command(name = "eventhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Configuration overlay to apply (`config/{env}`)
    #[arg(long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and persist the session
    Login(auth::LoginArgs),
    /// Sign out and forget the persisted session
    Logout,
    /// Create an account
    Register(auth::RegisterArgs),
    /// Show who is signed in
    Whoami,
    /// View or update your profile
    Profile(profile::ProfileArgs),
    /// Browse, create, and moderate events
    Events(events::EventsArgs),
    /// Event registrations
    Registrations(registrations::RegistrationsArgs),
    /// Attendance marking and export
    Attendance(attendance::AttendanceArgs),
    /// Event reviews
    Reviews(reviews::ReviewsArgs),
    /// Stream live notifications
    Watch(watch::WatchArgs),
    /// Collect notifications, then open, mark, or clear them interactively
    Notifications(notifications::NotificationsArgs),
    /// Check whether the signed-in user may open a page
    Access(access::AccessArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let ctx = Context::open(config, self.format).await?;
        match &self.command {
            Commands::Login(args) => auth::login(args, &ctx).await,
            Commands::Logout => auth::logout(&ctx).await,
            Commands::Register(args) => auth::register(args, &ctx).await,
            Commands::Whoami => auth::whoami(&ctx),
            Commands::Profile(args) => profile::execute(args, &ctx).await,
            Commands::Events(args) => events::execute(args, &ctx).await,
            Commands::Registrations(args) => registrations::execute(args, &ctx).await,
            Commands::Attendance(args) => attendance::execute(args, &ctx).await,
            Commands::Reviews(args) => reviews::execute(args, &ctx).await,
            Commands::Watch(args) => watch::execute(args, &ctx).await,
            Commands::Notifications(args) => notifications::execute(args, &ctx).await,
            Commands::Access(args) => access::execute(args, &ctx),
        }
    }
}

/// Everything a command needs: configuration, the restored session, and
/// the HTTP client the API and auth clients share.
#[derive(Debug)]
pub struct Context {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Selected output format.
    pub format: OutputFormat,
    /// Session restored from local storage.
    pub session: SessionStore,
    http: HttpClient,
}

impl Context {
    /// Build the clients and restore the persisted session.
    pub async fn open(config: AppConfig, format: OutputFormat) -> AppResult<Self> {
        let http = HttpClient::new(&config.api)?;
        let session = SessionStore::new(
            Arc::new(AuthClient::new(http.clone())),
            Arc::new(FileCredentialStore::new(&config.session.storage_path)),
            Arc::new(ConsoleNotifier),
        );
        let status = session.initialize().await;
        tracing::debug!(%status, storage = %config.session.storage_path, "Session restored");

        Ok(Self {
            config,
            format,
            session,
            http,
        })
    }

    /// REST client authorized with the current session's token.
    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.http.clone(), Arc::new(self.session.observer()))
    }

    /// The signed-in identity, if its role is one of `roles` (any role when empty).
    pub fn require(&self, roles: &[Role]) -> AppResult<Identity> {
        let state = self.session.state();
        AccessGuard::new().require(&state, roles)?;
        state
            .identity()
            .cloned()
            .ok_or_else(|| AppError::authentication("No signed-in user"))
    }

    /// Realtime channel bound to the session: it connects now if a user is
    /// signed in and disconnects on logout.
    pub fn channel(&self) -> AppResult<ChannelManager> {
        let endpoint = channel_endpoint(&self.config.api.base_url, &self.config.realtime.path)?;
        let chime: Arc<dyn Chime> = if self.config.realtime.chime {
            Arc::new(TerminalBell)
        } else {
            Arc::new(SilentChime)
        };
        let manager = ChannelManager::new(
            Arc::new(WsTransport::new(endpoint)),
            self.config.realtime.clone(),
            &self.config.feed,
            chime,
            Arc::new(ConsoleNotifier),
        );
        self.session.add_listener(Arc::new(manager.clone()));
        Ok(manager)
    }
}

/// Map a prompt failure into the application error type.
pub fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {}", e))
}

/// Parse role names given on the command line.
pub fn parse_roles(raw: &[String]) -> AppResult<Vec<Role>> {
    raw.iter().map(|r| r.parse::<Role>()).collect()
}
