//! Audio cue capability.

use crate::result::AppResult;

/// Plays the short sound that accompanies an incoming notification.
///
/// Callers treat the cue as fire-and-forget: a returned error is logged
/// and otherwise ignored.
pub trait Chime: Send + Sync + std::fmt::Debug + 'static {
    /// Start playing the cue without waiting for it to finish.
    fn play(&self) -> AppResult<()>;
}
