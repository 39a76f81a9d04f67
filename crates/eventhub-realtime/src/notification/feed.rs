//! Bounded, newest-first notification feed.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use eventhub_core::error::AppError;
use eventhub_core::types::NavigationTarget;

use super::record::{NotificationId, NotificationRecord, NotificationType};

/// Selection applied by [`NotificationFeed::filter_by_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedFilter {
    /// Every record.
    #[default]
    All,
    /// Only records of one type.
    Type(NotificationType),
}

impl FeedFilter {
    /// Whether a record passes the filter.
    pub fn matches(&self, record: &NotificationRecord) -> bool {
        match self {
            Self::All => true,
            Self::Type(kind) => record.kind == *kind,
        }
    }
}

impl fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Type(kind) => kind.fmt(f),
        }
    }
}

impl FromStr for FeedFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Type)
        }
    }
}

/// Point-in-time copy of a (possibly filtered) feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    /// Records, newest first.
    pub records: Vec<NotificationRecord>,
    /// Unread records in the whole feed, not just the filtered view.
    pub unread_count: usize,
}

/// Ordered collection of notification records.
///
/// Records are kept newest-first in arrival order and never re-sorted.
/// When the bound is reached the oldest record is evicted. The unread
/// counter is maintained incrementally and always equals the number of
/// records with `read == false`.
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    records: VecDeque<NotificationRecord>,
    unread: usize,
    max_records: usize,
}

impl NotificationFeed {
    /// Create an empty feed retaining at most `max_records` (minimum 1).
    pub fn new(max_records: usize) -> Self {
        Self {
            records: VecDeque::new(),
            unread: 0,
            max_records: max_records.max(1),
        }
    }

    /// Insert a record at the front. Returns the evicted record, if any.
    pub fn append(&mut self, record: NotificationRecord) -> Option<NotificationRecord> {
        if !record.read {
            self.unread += 1;
        }
        self.records.push_front(record);

        let evicted = if self.records.len() > self.max_records {
            self.records.pop_back()
        } else {
            None
        };
        if let Some(old) = &evicted {
            if !old.read {
                self.unread = self.unread.saturating_sub(1);
            }
            debug!(id = %old.id, bound = self.max_records, "Evicted oldest notification");
        }

        debug_assert_eq!(self.unread, self.recount_unread());
        evicted
    }

    /// Mark the record with `id` as read.
    ///
    /// Returns `true` only if an unread record changed state; unknown ids
    /// and already-read records are no-ops.
    pub fn mark_as_read(&mut self, id: &NotificationId) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| &r.id == id && !r.read) else {
            return false;
        };
        record.read = true;
        self.unread = self.unread.saturating_sub(1);
        debug_assert_eq!(self.unread, self.recount_unread());
        true
    }

    /// Mark every record read. Returns how many changed.
    pub fn mark_all_as_read(&mut self) -> usize {
        let changed = self.unread;
        for record in &mut self.records {
            record.read = true;
        }
        self.unread = 0;
        changed
    }

    /// Remove every record. Returns how many were removed.
    ///
    /// Irreversible; callers are expected to have confirmed with the user.
    pub fn clear(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        self.unread = 0;
        removed
    }

    /// Read-only view of the records matching `filter`, newest first.
    pub fn filter_by_type(
        &self,
        filter: FeedFilter,
    ) -> impl Iterator<Item = &NotificationRecord> + '_ {
        self.records.iter().filter(move |r| filter.matches(r))
    }

    /// Mark `record` read and describe where the UI should navigate.
    pub fn handle_click(&mut self, record: &NotificationRecord) -> Option<NavigationTarget> {
        self.mark_as_read(&record.id);
        record.navigation_target()
    }

    /// Copy of the filtered view together with the feed-wide unread count.
    pub fn snapshot(&self, filter: FeedFilter) -> FeedSnapshot {
        FeedSnapshot {
            records: self.filter_by_type(filter).cloned().collect(),
            unread_count: self.unread,
        }
    }

    /// Look up a record by id.
    pub fn get(&self, id: &NotificationId) -> Option<&NotificationRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Number of unread records.
    pub fn unread_count(&self) -> usize {
        self.unread
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the feed holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Retention bound.
    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// Unread count recomputed from the records.
    pub fn recount_unread(&self) -> usize {
        self.records.iter().filter(|r| !r.read).count()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;

    use super::*;

    fn record(id: &str, kind: NotificationType) -> NotificationRecord {
        NotificationRecord::new(NotificationId::server(id), kind, format!("msg {id}"), Utc::now())
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut feed = NotificationFeed::new(10);
        feed.append(record("a", NotificationType::Event));
        feed.append(record("b", NotificationType::Alert));

        let ids: Vec<_> = feed.filter_by_type(FeedFilter::All).map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(feed.unread_count(), 2);
    }

    #[test]
    fn test_append_read_record_does_not_count() {
        let mut feed = NotificationFeed::new(10);
        let mut seen = record("a", NotificationType::Generic);
        seen.read = true;
        feed.append(seen);
        assert_eq!(feed.unread_count(), 0);
    }

    #[test]
    fn test_mark_as_read_is_idempotent() {
        let mut feed = NotificationFeed::new(10);
        feed.append(record("a", NotificationType::Event));
        feed.append(record("b", NotificationType::Event));

        let id = NotificationId::server("a");
        assert!(feed.mark_as_read(&id));
        assert!(!feed.mark_as_read(&id));
        assert_eq!(feed.unread_count(), 1);

        assert!(!feed.mark_as_read(&NotificationId::server("missing")));
        assert_eq!(feed.unread_count(), 1);
    }

    #[test]
    fn test_mark_all_and_clear() {
        let mut feed = NotificationFeed::new(10);
        feed.append(record("a", NotificationType::Event));
        feed.append(record("b", NotificationType::Registration));

        assert_eq!(feed.mark_all_as_read(), 2);
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(feed.len(), 2);

        assert_eq!(feed.clear(), 2);
        assert!(feed.is_empty());
        assert!(!feed.mark_as_read(&NotificationId::server("a")));
        assert_eq!(feed.filter_by_type(FeedFilter::All).count(), 0);
        assert_eq!(
            feed.filter_by_type(FeedFilter::Type(NotificationType::Event)).count(),
            0
        );
    }

    #[test]
    fn test_filter_does_not_mutate() {
        let mut feed = NotificationFeed::new(10);
        feed.append(record("a", NotificationType::Event));
        feed.append(record("b", NotificationType::Alert));
        feed.append(record("c", NotificationType::Event));

        let events: Vec<_> = feed
            .filter_by_type(FeedFilter::Type(NotificationType::Event))
            .map(|r| r.id.as_str().to_string())
            .collect();
        assert_eq!(events, ["c", "a"]);
        assert_eq!(feed.len(), 3);

        let snapshot = feed.snapshot(FeedFilter::Type(NotificationType::Alert));
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.unread_count, 3);
    }

    #[test]
    fn test_handle_click_marks_read_and_targets_event() {
        let mut feed = NotificationFeed::new(10);
        let n1 = record("n1", NotificationType::Event).with_event("e5");
        feed.append(n1.clone());

        let target = feed.handle_click(&n1);
        assert_eq!(target.map(|t| t.path()).as_deref(), Some("/events/e5"));
        assert_eq!(feed.unread_count(), 0);
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let mut feed = NotificationFeed::new(2);
        feed.append(record("a", NotificationType::Event));
        feed.append(record("b", NotificationType::Event));
        let evicted = feed.append(record("c", NotificationType::Event));

        assert_eq!(evicted.map(|r| r.id), Some(NotificationId::server("a")));
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.unread_count(), 2);
        assert!(feed.get(&NotificationId::server("a")).is_none());
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<FeedFilter>().expect("all"), FeedFilter::All);
        assert_eq!(
            "registration".parse::<FeedFilter>().expect("type"),
            FeedFilter::Type(NotificationType::Registration)
        );
        assert!("bogus".parse::<FeedFilter>().is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Append { id: u8, read: bool },
        MarkAsRead(u8),
        MarkAllAsRead,
        Clear,
        Click(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0u8..16, any::<bool>()).prop_map(|(id, read)| Op::Append { id, read }),
            3 => (0u8..16).prop_map(Op::MarkAsRead),
            1 => Just(Op::MarkAllAsRead),
            1 => Just(Op::Clear),
            2 => (0u8..16).prop_map(Op::Click),
        ]
    }

    proptest! {
        #[test]
        fn prop_unread_count_matches_records(ops in prop::collection::vec(op(), 0..64), bound in 1usize..12) {
            let mut feed = NotificationFeed::new(bound);
            for op in ops {
                match op {
                    Op::Append { id, read } => {
                        let mut r = record(&id.to_string(), NotificationType::Generic);
                        r.read = read;
                        feed.append(r);
                    }
                    Op::MarkAsRead(id) => {
                        feed.mark_as_read(&NotificationId::server(id.to_string()));
                    }
                    Op::MarkAllAsRead => {
                        feed.mark_all_as_read();
                    }
                    Op::Clear => {
                        feed.clear();
                    }
                    Op::Click(id) => {
                        let found = feed.get(&NotificationId::server(id.to_string())).cloned();
                        if let Some(r) = found {
                            feed.handle_click(&r);
                        }
                    }
                }
                prop_assert_eq!(feed.unread_count(), feed.recount_unread());
                prop_assert!(feed.len() <= bound);
            }
        }
    }
}
