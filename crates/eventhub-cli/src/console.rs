//! Terminal rendering of toasts.

use eventhub_core::traits::{Notifier, Toast, ToastLevel};

/// Prints toasts to stderr so they interleave with, but never pollute,
/// command output on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn render(toast: &Toast) -> String {
        let marker = match toast.level {
            ToastLevel::Plain => "•",
            ToastLevel::Info => "ℹ",
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✗",
        };
        match &toast.action {
            Some(action) => format!(
                "{marker} {}  [{}: {}]",
                toast.message,
                action.label,
                action.target.path()
            ),
            None => format!("{marker} {}", toast.message),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        eprintln!("{}", Self::render(&toast));
    }
}

#[cfg(test)]
mod tests {
    use eventhub_core::types::{EventId, NavigationTarget};

    use super::*;

    #[test]
    fn test_render_with_action() {
        let toast = Toast::plain("Event updated").with_action(
            "View",
            NavigationTarget::EventDetail {
                event_id: EventId::from("e5"),
            },
        );
        assert_eq!(
            ConsoleNotifier::render(&toast),
            "• Event updated  [View: /events/e5]"
        );
        assert_eq!(
            ConsoleNotifier::render(&Toast::error("Login failed")),
            "✗ Login failed"
        );
    }
}
