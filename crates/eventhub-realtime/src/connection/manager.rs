//! Realtime channel manager.
//!
//! Owns at most one live connection, bound to the current authenticated
//! session. The feed and the connection state of a session share a single
//! mutex; every write re-checks the connection generation under that lock
//! so events from a superseded connection are discarded.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use eventhub_core::config::{FeedConfig, RealtimeConfig};
use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;
use eventhub_core::traits::{Chime, Notifier, Toast};
use eventhub_core::types::{Identity, NavigationTarget, UserId};
use eventhub_session::SessionListener;

use super::state::{ConnectionSnapshot, ConnectionState};
use super::transport::{ChannelLink, ChannelTransport};
use crate::message::dispatch::{Arrival, DispatchTable};
use crate::message::types::{ChannelEvent, WireFrame};
use crate::notification::effects::play_quietly;
use crate::notification::feed::{FeedFilter, FeedSnapshot, NotificationFeed};
use crate::notification::formatter::ToastFormatter;
use crate::notification::record::{NotificationId, NotificationRecord};

/// State guarded by the per-session mutex.
#[derive(Debug)]
struct Shared {
    snapshot: ConnectionSnapshot,
    feed: NotificationFeed,
    cancel: Option<CancellationToken>,
    /// Why the current generation gave up, once it is `Failed`.
    failure: Option<AppError>,
}

#[derive(Debug)]
struct Inner {
    transport: Arc<dyn ChannelTransport>,
    config: RealtimeConfig,
    dispatch: DispatchTable,
    chime: Arc<dyn Chime>,
    notifier: Arc<dyn Notifier>,
    shared: Mutex<Shared>,
    state_tx: watch::Sender<ConnectionSnapshot>,
    events_tx: broadcast::Sender<ChannelEvent>,
}

/// Why an established connection ended.
enum Ended {
    Cancelled,
    Superseded,
    Dropped(String),
}

/// Manages the realtime channel and the notification feed it fills.
///
/// Cheap to clone; clones share the same connection and feed.
#[derive(Debug, Clone)]
pub struct ChannelManager {
    inner: Arc<Inner>,
}

impl ChannelManager {
    /// Create a disconnected manager.
    pub fn new(
        transport: Arc<dyn ChannelTransport>,
        config: RealtimeConfig,
        feed: &FeedConfig,
        chime: Arc<dyn Chime>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let snapshot = ConnectionSnapshot::disconnected(0);
        let (state_tx, _) = watch::channel(snapshot);
        let (events_tx, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            inner: Arc::new(Inner {
                transport,
                config,
                dispatch: DispatchTable::standard(),
                chime,
                notifier,
                shared: Mutex::new(Shared {
                    snapshot,
                    feed: NotificationFeed::new(feed.max_records),
                    cancel: None,
                    failure: None,
                }),
                state_tx,
                events_tx,
            }),
        }
    }

    /// Open a fresh connection for `user_id`, tearing down any previous one.
    ///
    /// The feed starts empty. Must be called from within a tokio runtime.
    pub fn start(&self, token: &str, user_id: &UserId) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!("Realtime channel cannot start outside a tokio runtime");
            return;
        };

        let (generation, cancel) = {
            let mut shared = self.inner.lock();
            if let Some(previous) = shared.cancel.take() {
                previous.cancel();
            }
            let generation = shared.snapshot.generation + 1;
            let cancel = CancellationToken::new();
            shared.cancel = Some(cancel.clone());
            shared.failure = None;
            shared.feed.clear();
            self.inner.publish(
                &mut shared,
                ConnectionSnapshot {
                    state: ConnectionState::Connecting,
                    retry_count: 0,
                    generation,
                },
            );
            (generation, cancel)
        };

        info!(user_id = %user_id, generation, "Starting realtime channel");
        let inner = Arc::clone(&self.inner);
        let token = token.to_string();
        let user_id = user_id.clone();
        runtime.spawn(async move {
            inner.run(generation, cancel, token, user_id).await;
        });
    }

    /// Tear down the connection and empty the feed.
    ///
    /// Takes effect before returning: the state is `Disconnected` and no
    /// further events from the old connection reach the feed.
    pub fn stop(&self) {
        let mut shared = self.inner.lock();
        let had_connection = shared.cancel.take().map(|c| c.cancel()).is_some();
        let generation = shared.snapshot.generation + 1;
        shared.failure = None;
        shared.feed.clear();
        self.inner
            .publish(&mut shared, ConnectionSnapshot::disconnected(generation));
        drop(shared);

        if had_connection {
            info!(generation, "Realtime channel torn down");
        }
    }

    /// Current connection snapshot.
    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.inner.lock().snapshot
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.snapshot().state
    }

    /// Whether the channel is live.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Why the channel gave up, while it is `Failed`.
    pub fn failure(&self) -> Option<AppError> {
        self.inner.lock().failure.clone()
    }

    /// Watch connection snapshots.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionSnapshot> {
        self.inner.state_tx.subscribe()
    }

    /// Receive normalized inbound events as they are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Copy of the feed filtered by `filter`.
    pub fn notifications(&self, filter: FeedFilter) -> FeedSnapshot {
        self.inner.lock().feed.snapshot(filter)
    }

    /// Number of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.inner.lock().feed.unread_count()
    }

    /// Mark one notification read.
    pub fn mark_as_read(&self, id: &NotificationId) -> bool {
        self.inner.lock().feed.mark_as_read(id)
    }

    /// Mark every notification read.
    pub fn mark_all_as_read(&self) -> usize {
        self.inner.lock().feed.mark_all_as_read()
    }

    /// Empty the feed. Callers confirm with the user first.
    pub fn clear_notifications(&self) -> usize {
        let removed = self.inner.lock().feed.clear();
        debug!(removed, "Notifications cleared");
        removed
    }

    /// Mark `record` read and return where the UI should navigate.
    pub fn handle_click(&self, record: &NotificationRecord) -> Option<NavigationTarget> {
        self.inner.lock().feed.handle_click(record)
    }
}

impl SessionListener for ChannelManager {
    fn on_authenticated(&self, token: &str, identity: &Identity) {
        self.start(token, &identity.id);
    }

    fn on_signed_out(&self) {
        self.stop();
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, shared: &mut Shared, snapshot: ConnectionSnapshot) {
        shared.snapshot = snapshot;
        self.state_tx.send_replace(snapshot);
    }

    /// Move to `state` if `generation` is still current.
    fn transition(&self, generation: u64, state: ConnectionState, retry_count: u32) -> bool {
        let mut shared = self.lock();
        if shared.snapshot.generation != generation {
            return false;
        }
        debug!(generation, from = %shared.snapshot.state, to = %state, retry_count, "Channel transition");
        self.publish(
            &mut shared,
            ConnectionSnapshot {
                state,
                retry_count,
                generation,
            },
        );
        true
    }

    /// Connection loop for one generation.
    async fn run(
        self: Arc<Self>,
        generation: u64,
        cancel: CancellationToken,
        token: String,
        user_id: UserId,
    ) {
        let max_attempts = self.config.reconnect.max_attempts;
        let mut retry_count: u32 = 0;

        loop {
            let attempt = tokio::select! {
                _ = cancel.cancelled() => return,
                attempt = self.establish(&token) => attempt,
            };

            match attempt {
                Ok(mut link) => {
                    retry_count = 0;
                    match self.serve(generation, &cancel, &user_id, link.as_mut()).await {
                        Ended::Cancelled | Ended::Superseded => {
                            link.close().await;
                            return;
                        }
                        Ended::Dropped(reason) => {
                            warn!(generation, %reason, "Realtime connection dropped");
                            link.close().await;
                            self.emit(ChannelEvent::Disconnected { reason });
                        }
                    }
                }
                Err(e) => {
                    warn!(generation, attempt = retry_count + 1, error = %e, "Realtime connect attempt failed");
                }
            }

            if retry_count >= max_attempts {
                self.give_up(generation, retry_count);
                return;
            }

            retry_count += 1;
            if !self.transition(generation, ConnectionState::Reconnecting, retry_count) {
                return;
            }
            let delay = self.config.reconnect.backoff.delay_for_attempt(retry_count);
            debug!(generation, retry_count, delay_ms = delay.as_millis() as u64, "Reconnecting");
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            if !self.transition(generation, ConnectionState::Connecting, retry_count) {
                return;
            }
        }
    }

    /// Move to `Failed` and record why, if `generation` is still current.
    fn give_up(&self, generation: u64, retry_count: u32) {
        let failure = AppError::retries_exhausted(format!(
            "Realtime channel gave up after {retry_count} reconnect attempts"
        ));
        {
            let mut shared = self.lock();
            if shared.snapshot.generation != generation {
                return;
            }
            // Recorded before the state flips so watchers of `Failed` see it.
            shared.failure = Some(failure.clone());
            self.publish(
                &mut shared,
                ConnectionSnapshot {
                    state: ConnectionState::Failed,
                    retry_count,
                    generation,
                },
            );
        }
        error!(generation, error = %failure, "Realtime channel failed, giving up");
        self.toast(generation, ToastFormatter::retries_exhausted(retry_count));
    }

    /// Open a link and complete the handshake within the timeout.
    async fn establish(&self, token: &str) -> AppResult<Box<dyn ChannelLink>> {
        let timeout = self.config.handshake_timeout();
        match tokio::time::timeout(timeout, self.handshake(token)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::new(
                ErrorKind::Transport,
                format!("Handshake timed out after {}s", timeout.as_secs()),
            )),
        }
    }

    async fn handshake(&self, token: &str) -> AppResult<Box<dyn ChannelLink>> {
        let mut link = self.transport.connect().await?;
        link.send(WireFrame::auth(token)).await?;

        loop {
            let frame = match link.recv().await {
                None => return Err(AppError::transport("Connection closed during handshake")),
                Some(Err(e)) if e.kind == ErrorKind::Serialization => {
                    debug!(error = %e, "Dropping undecodable frame during handshake");
                    continue;
                }
                Some(Err(e)) => return Err(e),
                Some(Ok(frame)) => frame,
            };

            match self.dispatch.dispatch(&frame, &Arrival::now()) {
                Ok(Some(ChannelEvent::Connected)) => return Ok(link),
                Ok(Some(ChannelEvent::Error { message })) => {
                    return Err(AppError::transport("Handshake rejected").with_server_message(message));
                }
                _ => trace!(event = %frame.event, "Ignoring frame before handshake ack"),
            }
        }
    }

    /// Announce the identity, then pump inbound frames until the link ends.
    async fn serve(
        &self,
        generation: u64,
        cancel: &CancellationToken,
        user_id: &UserId,
        link: &mut dyn ChannelLink,
    ) -> Ended {
        if !self.transition(generation, ConnectionState::Connected, 0) {
            return Ended::Superseded;
        }
        info!(generation, user_id = %user_id, "Realtime channel connected");
        self.emit(ChannelEvent::Connected);

        if let Err(e) = link.send(WireFrame::join(user_id)).await {
            return Ended::Dropped(format!("join failed: {e}"));
        }

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Ended::Cancelled,
                next = link.recv() => next,
            };

            let frame = match next {
                None => return Ended::Dropped("closed by server".to_string()),
                Some(Err(e)) if e.kind == ErrorKind::Serialization => {
                    debug!(generation, error = %e, "Dropping undecodable frame");
                    continue;
                }
                Some(Err(e)) => return Ended::Dropped(e.to_string()),
                Some(Ok(frame)) => frame,
            };

            match self.dispatch.dispatch(&frame, &Arrival::now()) {
                Ok(Some(ChannelEvent::Connected)) => trace!("Duplicate connect ack ignored"),
                Ok(Some(ChannelEvent::Disconnected { reason })) => {
                    return Ended::Dropped(reason);
                }
                Ok(Some(event)) => {
                    if !self.deliver(generation, event) {
                        return Ended::Superseded;
                    }
                }
                Ok(None) => trace!(event = %frame.event, "Unhandled channel event"),
                Err(e) => debug!(event = %frame.event, error = %e, "Dropping malformed payload"),
            }
        }
    }

    /// Apply an inbound event: feed append under the lock, then side effects.
    ///
    /// Returns `false` if the generation is stale and the event was dropped.
    fn deliver(&self, generation: u64, event: ChannelEvent) -> bool {
        {
            let mut shared = self.lock();
            if shared.snapshot.generation != generation {
                debug!(generation, current = shared.snapshot.generation, "Discarding stale event");
                return false;
            }
            if let ChannelEvent::Notification(record) = &event {
                shared.feed.append(record.clone());
            }
        }

        self.side_effects(generation, &event);
        // A stop during the side effects also withholds the event.
        if !self.is_current(generation) {
            return false;
        }
        self.emit(event);
        true
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().snapshot.generation == generation
    }

    /// Toasts and chimes for an event. Each one re-checks the generation,
    /// so nothing is shown for a session that ended mid-delivery.
    fn side_effects(&self, generation: u64, event: &ChannelEvent) {
        match event {
            ChannelEvent::Notification(record) => {
                debug!(id = %record.id, kind = %record.kind, "Notification received");
                self.chime(generation);
                self.toast(generation, ToastFormatter::notification(record));
            }
            ChannelEvent::EventUpdated { title } => {
                self.toast(generation, ToastFormatter::event_updated(title));
                self.chime(generation);
            }
            ChannelEvent::RegistrationConfirmed { event_title } => {
                self.toast(generation, ToastFormatter::registration_confirmed(event_title));
                self.chime(generation);
            }
            ChannelEvent::Error { message } => {
                error!(%message, "Realtime channel error");
                self.toast(generation, ToastFormatter::channel_error());
            }
            ChannelEvent::Connected | ChannelEvent::Disconnected { .. } => {}
        }
    }

    fn toast(&self, generation: u64, toast: Toast) {
        if self.is_current(generation) {
            self.notifier.notify(toast);
        } else {
            debug!(generation, "Suppressing toast for a superseded connection");
        }
    }

    fn chime(&self, generation: u64) {
        if self.config.chime && self.is_current(generation) {
            play_quietly(self.chime.as_ref());
        }
    }

    fn emit(&self, event: ChannelEvent) {
        // No subscribers is fine.
        let _ = self.events_tx.send(event);
    }
}
