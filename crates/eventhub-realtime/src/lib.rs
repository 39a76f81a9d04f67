//! # eventhub-realtime
//!
//! Live notification channel for the EventHub client. Provides:
//!
//! - A channel manager owning one connection per authenticated session,
//!   with bounded reconnects, handshake timeout, and stale-event discard
//! - A typed dispatch table normalizing inbound events
//! - A bounded, newest-first notification feed with read/unread tracking
//! - Audio cue and toast side effects

pub mod connection;
pub mod message;
pub mod notification;

pub use connection::{
    ChannelLink, ChannelManager, ChannelTransport, ConnectionSnapshot, ConnectionState,
    WsTransport, channel_endpoint,
};
pub use message::{ChannelEvent, DispatchTable, WireFrame};
pub use notification::{
    FeedFilter, FeedSnapshot, NotificationFeed, NotificationId, NotificationRecord,
    NotificationType, SilentChime, TerminalBell, ToastFormatter, TracingNotifier,
};
