//! Connection lifecycle states.

use std::fmt;

use serde::Serialize;

/// Lifecycle state of the realtime channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection and none wanted.
    Disconnected,
    /// Opening the transport and performing the handshake.
    Connecting,
    /// Handshake done, receiving events.
    Connected,
    /// Waiting before the next attempt.
    Reconnecting,
    /// Reconnect attempts exhausted.
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Published view of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSnapshot {
    /// Current state.
    pub state: ConnectionState,
    /// Consecutive failed attempts since the last successful connect.
    pub retry_count: u32,
    /// Connection generation; bumped on every start and teardown.
    pub generation: u64,
}

impl ConnectionSnapshot {
    /// Initial, disconnected snapshot.
    pub fn disconnected(generation: u64) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            retry_count: 0,
            generation,
        }
    }
}
