//! Notification feed configuration.

use serde::{Deserialize, Serialize};

/// Bounds for the in-memory notification feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Maximum number of records retained; the oldest are evicted first.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
        }
    }
}

fn default_max_records() -> usize {
    200
}
