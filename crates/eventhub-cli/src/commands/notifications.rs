//! Interactive notification inbox.

use clap::Args;
use dialoguer::{Confirm, Select};

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_realtime::FeedFilter;

use super::watch::{follow, print_feed};
use super::{Context, input_error};
use crate::output;

const ACTIONS: [&str; 4] = ["Open a notification", "Mark all as read", "Clear all", "Quit"];

/// Arguments for `notifications`
#[derive(Debug, Args)]
pub struct NotificationsArgs {
    /// Seconds to collect notifications before opening the inbox
    #[arg(short, long, default_value_t = 30)]
    pub seconds: u64,
}

/// Collect notifications, then let the user open, mark, or clear them
pub async fn execute(args: &NotificationsArgs, ctx: &Context) -> Result<(), AppError> {
    ctx.require(&[])?;
    let channel = ctx.channel()?;
    output::print_kv("Collecting for", &format!("{}s", args.seconds));
    // The inbox still opens on what was collected before the channel gave up.
    let collected = match follow(&channel, Some(args.seconds)).await {
        Err(e) if e.kind == ErrorKind::RetriesExhausted => {
            output::print_warning("Live notifications unavailable");
            Ok(())
        }
        other => other,
    };

    let result = collected.and_then(|()| {
        loop {
            print_feed(&channel, FeedFilter::All, ctx.format);
            let records = channel.notifications(FeedFilter::All).records;
            if records.is_empty() {
                break;
            }

            let choice = Select::new()
                .with_prompt("Notifications")
                .items(&ACTIONS)
                .default(0)
                .interact()
                .map_err(input_error)?;
            match choice {
                0 => {
                    let labels: Vec<String> = records
                        .iter()
                        .map(|r| {
                            let marker = if r.read { " " } else { "*" };
                            format!("{marker} [{}] {}", r.kind, r.message)
                        })
                        .collect();
                    let picked = Select::new()
                        .with_prompt("Open")
                        .items(&labels)
                        .default(0)
                        .interact()
                        .map_err(input_error)?;
                    match channel.handle_click(&records[picked]) {
                        Some(target) => output::print_kv("Navigate to", &target.path()),
                        None => output::print_warning("Nothing to open for this notification"),
                    }
                }
                1 => {
                    let changed = channel.mark_all_as_read();
                    output::print_success(&format!("Marked {changed} notification(s) as read"));
                }
                2 => {
                    let confirm = Confirm::new()
                        .with_prompt("Clear all notifications? This cannot be undone")
                        .default(false)
                        .interact()
                        .map_err(input_error)?;
                    if confirm {
                        let removed = channel.clear_notifications();
                        output::print_success(&format!("Cleared {removed} notification(s)"));
                    }
                }
                _ => break,
            }
        }
        Ok(())
    });

    channel.stop();
    result
}
