//! Side-effect implementations: audio cues and toast sinks.

use std::io::Write;

use tracing::{error, info, warn};

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;
use eventhub_core::traits::{Chime, Notifier, Toast, ToastLevel};

/// Chime that does nothing. Used headless and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentChime;

impl Chime for SilentChime {
    fn play(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Chime for TerminalBell {
    fn play(&self) -> AppResult<()> {
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all(b"\x07")
            .and_then(|()| stderr.flush())
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to ring bell", e))
    }
}

/// Toast sink that writes toasts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        let action = toast.action.as_ref().map(|a| a.target.path());
        match toast.level {
            ToastLevel::Error => error!(message = %toast.message, "Toast"),
            ToastLevel::Plain | ToastLevel::Info | ToastLevel::Success => {
                info!(level = ?toast.level, message = %toast.message, action = ?action, "Toast")
            }
        }
    }
}

/// Play the chime, logging and swallowing any failure.
pub fn play_quietly(chime: &dyn Chime) {
    if let Err(e) = chime.play() {
        warn!(error = %e, "Notification chime failed");
    }
}
