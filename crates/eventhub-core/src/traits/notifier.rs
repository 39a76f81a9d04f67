//! Transient user-visible messages ("toasts").

use serde::{Deserialize, Serialize};

use crate::types::NavigationTarget;

/// Visual weight of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// Neutral message, used for notification arrivals.
    Plain,
    /// Informational notice.
    Info,
    /// An operation succeeded.
    Success,
    /// An operation failed.
    Error,
}

/// Button attached to a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastAction {
    /// Button label.
    pub label: String,
    /// Where the button leads.
    pub target: NavigationTarget,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Visual weight.
    pub level: ToastLevel,
    /// Message text.
    pub message: String,
    /// Optional action button.
    pub action: Option<ToastAction>,
}

impl Toast {
    /// Build a toast with the given level and no action.
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            action: None,
        }
    }

    /// Neutral toast.
    pub fn plain(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Plain, message)
    }

    /// Informational toast.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message)
    }

    /// Success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    /// Error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }

    /// Attach an action button.
    pub fn with_action(mut self, label: impl Into<String>, target: NavigationTarget) -> Self {
        self.action = Some(ToastAction {
            label: label.into(),
            target,
        });
        self
    }
}

/// Sink for toasts. Implementations must not block.
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Show a toast.
    fn notify(&self, toast: Toast);
}
