//! Live notification streaming.

use std::time::Duration;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use eventhub_core::error::AppError;
use eventhub_realtime::{ChannelManager, ConnectionState, FeedFilter, NotificationRecord};

use super::Context;
use crate::output;

/// Arguments for `watch`
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Only summarize notifications of this type (all, event, registration, alert, generic)
    #[arg(short = 't', long = "type", default_value = "all")]
    pub kind: String,
    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    pub seconds: Option<u64>,
}

/// Notification display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct NotificationRow {
    /// Notification ID
    pub id: String,
    /// Type
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    pub kind: String,
    /// Message
    pub message: String,
    /// Received
    pub received: String,
    /// Read
    pub read: String,
}

impl From<&NotificationRecord> for NotificationRow {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            id: record.id.to_string(),
            kind: record.kind.to_string(),
            message: record.message.clone(),
            received: output::timestamp(&record.created_at),
            read: if record.read { "yes" } else { "no" }.to_string(),
        }
    }
}

/// Keep the channel open until the deadline, Ctrl-C, or the channel
/// giving up, printing connection state changes as they happen.
///
/// A channel that gives up is reported as a `RetriesExhausted` error.
pub async fn follow(channel: &ChannelManager, seconds: Option<u64>) -> Result<(), AppError> {
    let mut state = channel.watch_state();
    let deadline = async {
        match seconds {
            Some(s) => tokio::time::sleep(Duration::from_secs(s)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    output::print_kv("Channel", &channel.state().to_string());

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            interrupted = tokio::signal::ctrl_c() => {
                interrupted?;
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *state.borrow_and_update();
                info!(
                    state = %snapshot.state,
                    retry = snapshot.retry_count,
                    generation = snapshot.generation,
                    "Channel state changed"
                );
                output::print_kv("Channel", &snapshot.state.to_string());
                if snapshot.state == ConnectionState::Failed {
                    return match channel.failure() {
                        Some(failure) => Err(failure),
                        None => Ok(()),
                    };
                }
            }
        }
    }
    Ok(())
}

/// Print the feed, filtered, with the feed-wide unread count.
pub fn print_feed(channel: &ChannelManager, filter: FeedFilter, format: output::OutputFormat) {
    let snapshot = channel.notifications(filter);
    match format {
        output::OutputFormat::Json => output::print_json(&snapshot),
        output::OutputFormat::Table => {
            let rows: Vec<NotificationRow> =
                snapshot.records.iter().map(NotificationRow::from).collect();
            output::print_list(&rows, format);
            output::print_kv("Filter", &filter.to_string());
            output::print_kv("Unread", &snapshot.unread_count.to_string());
        }
    }
}

/// Stream live notifications, then summarize the feed
pub async fn execute(args: &WatchArgs, ctx: &Context) -> Result<(), AppError> {
    let filter: FeedFilter = args.kind.parse()?;
    let identity = ctx.require(&[])?;
    let channel = ctx.channel()?;
    output::print_kv("Watching as", &identity.full_name);

    let result = follow(&channel, args.seconds).await;
    print_feed(&channel, filter, ctx.format);
    channel.stop();
    result
}
