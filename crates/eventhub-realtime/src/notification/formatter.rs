//! Toast formatting for inbound channel events.

use eventhub_core::traits::Toast;

use super::record::NotificationRecord;

/// Label of the action button on notification toasts.
pub const VIEW_ACTION: &str = "View";

/// Formats the toasts shown for channel events.
pub struct ToastFormatter;

impl ToastFormatter {
    /// Toast for a notification arrival, with a "View" action when the
    /// record has somewhere to navigate to.
    pub fn notification(record: &NotificationRecord) -> Toast {
        let toast = Toast::plain(record.message.clone());
        match record.navigation_target() {
            Some(target) => toast.with_action(VIEW_ACTION, target),
            None => toast,
        }
    }

    /// Toast for an event update notice.
    pub fn event_updated(title: &str) -> Toast {
        Toast::info(format!("Event \"{title}\" has been updated"))
    }

    /// Toast for a registration confirmation.
    pub fn registration_confirmed(event_title: &str) -> Toast {
        Toast::success(format!("Registration confirmed for \"{event_title}\""))
    }

    /// Toast for a channel-level error. The server's detail is logged, not shown.
    pub fn channel_error() -> Toast {
        Toast::error("Connection error occurred")
    }

    /// Toast shown once when reconnect attempts run out.
    pub fn retries_exhausted(attempts: u32) -> Toast {
        Toast::error(format!(
            "Live notifications unavailable after {attempts} reconnect attempts"
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use eventhub_core::traits::ToastLevel;
    use eventhub_core::types::NavigationTarget;

    use super::*;
    use crate::notification::record::{NotificationId, NotificationType};

    #[test]
    fn test_notification_toast_has_view_action() {
        let record = NotificationRecord::new(
            NotificationId::server("n1"),
            NotificationType::Registration,
            "You are in",
            Utc::now(),
        );
        let toast = ToastFormatter::notification(&record);
        assert_eq!(toast.level, ToastLevel::Plain);
        let action = toast.action.expect("action");
        assert_eq!(action.label, "View");
        assert_eq!(action.target, NavigationTarget::Registrations);
    }

    #[test]
    fn test_generic_notification_has_no_action() {
        let record = NotificationRecord::new(
            NotificationId::generate(),
            NotificationType::Generic,
            "hello",
            Utc::now(),
        );
        assert!(ToastFormatter::notification(&record).action.is_none());
    }

    #[test]
    fn test_event_notices() {
        assert_eq!(
            ToastFormatter::event_updated("Hackathon").message,
            "Event \"Hackathon\" has been updated"
        );
        let confirmed = ToastFormatter::registration_confirmed("Hackathon");
        assert_eq!(confirmed.level, ToastLevel::Success);
        assert_eq!(confirmed.message, "Registration confirmed for \"Hackathon\"");
    }
}
