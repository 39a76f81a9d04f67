//! Notification feed, records, and the side effects of notification arrival.

pub mod effects;
pub mod feed;
pub mod formatter;
pub mod record;

pub use effects::{SilentChime, TerminalBell, TracingNotifier};
pub use feed::{FeedFilter, FeedSnapshot, NotificationFeed};
pub use formatter::ToastFormatter;
pub use record::{NotificationId, NotificationRecord, NotificationType};
