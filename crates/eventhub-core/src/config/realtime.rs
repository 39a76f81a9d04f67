//! Realtime notification channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Realtime (WebSocket) channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Path appended to the API origin to form the channel endpoint.
    #[serde(default = "default_path")]
    pub path: String,
    /// Seconds a connect + handshake attempt may take before it is abandoned.
    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout_seconds: u64,
    /// Reconnect policy.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    /// Whether to play the audio cue on incoming notifications.
    #[serde(default = "default_true")]
    pub chime: bool,
    /// Buffer size of the broadcast channel carrying inbound events to observers.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl RealtimeConfig {
    /// Handshake timeout as a [`Duration`].
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_seconds)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            handshake_timeout_seconds: default_handshake_timeout(),
            reconnect: ReconnectConfig::default(),
            chime: true,
            event_buffer: default_event_buffer(),
        }
    }
}

/// Bounded reconnect policy for the realtime channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Failed attempts tolerated before the channel is marked failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay schedule between attempts.
    #[serde(default)]
    pub backoff: BackoffConfig,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: BackoffConfig::default(),
        }
    }
}

/// Delay schedule between reconnect attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackoffConfig {
    /// Same delay before every attempt.
    Fixed {
        /// Delay in milliseconds.
        delay_ms: u64,
    },
    /// Delay grows geometrically up to a ceiling.
    Exponential {
        /// Delay before the first retry, in milliseconds.
        initial_ms: u64,
        /// Upper bound on the delay, in milliseconds.
        max_ms: u64,
        /// Growth factor per attempt.
        multiplier: f64,
    },
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self::Fixed { delay_ms: 1000 }
    }
}

impl BackoffConfig {
    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay_ms } => Duration::from_millis(*delay_ms),
            Self::Exponential {
                initial_ms,
                max_ms,
                multiplier,
            } => {
                let exponent = attempt.saturating_sub(1).min(32) as i32;
                let scaled = (*initial_ms as f64) * multiplier.max(1.0).powi(exponent);
                let capped = scaled.min(*max_ms as f64);
                Duration::from_millis(capped as u64)
            }
        }
    }
}

fn default_path() -> String {
    "/ws".to_string()
}

fn default_handshake_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_event_buffer() -> usize {
    64
}
