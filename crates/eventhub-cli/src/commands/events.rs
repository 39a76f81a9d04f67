//! Event commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use eventhub_api::models::{Event, EventDecision, EventFilters, EventStatus, NewEvent};
use eventhub_core::error::AppError;
use eventhub_core::types::{EventId, Role};

use super::{Context, input_error};
use crate::output;

/// Roles allowed to approve, reject, or remove events.
const MODERATORS: &[Role] = &[Role::HeadFaculty, Role::Faculty];

/// Arguments for event commands
#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Event subcommand
    #[command(subcommand)]
    pub command: EventsCommand,
}

/// Event subcommands
#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events
    List {
        /// Filter by status (pending, approved, rejected, active, completed)
        #[arg(short, long)]
        status: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one event
    Show {
        /// Event ID
        id: String,
    },
    /// Propose a new event (coordinators)
    Create {
        /// Title
        #[arg(long)]
        title: String,
        /// Description
        #[arg(long)]
        description: String,
        /// Date and time (ISO 8601)
        #[arg(long)]
        date: String,
        /// Location
        #[arg(long)]
        location: String,
        /// Poster image
        #[arg(long)]
        poster: Option<PathBuf>,
    },
    /// Approve a pending event
    Approve {
        /// Event ID
        id: String,
    },
    /// Reject a pending event
    Reject {
        /// Event ID
        id: String,
        /// Reason shown to the coordinator
        #[arg(short, long)]
        reason: String,
    },
    /// Change an event's lifecycle status
    Status {
        /// Event ID
        id: String,
        /// New status
        status: String,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Event display row for table output
#[derive(Debug, Serialize, Tabled)]
struct EventRow {
    /// Event ID
    id: String,
    /// Title
    title: String,
    /// Status
    status: String,
    /// Location
    location: String,
    /// Starts
    starts: String,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            status: event
                .status
                .as_ref()
                .map(EventStatus::to_string)
                .unwrap_or_else(|| "-".to_string()),
            location: output::or_dash(event.location.as_deref()),
            starts: event
                .start_date
                .as_ref()
                .map(output::timestamp)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute event commands
pub async fn execute(args: &EventsArgs, ctx: &Context) -> Result<(), AppError> {
    let api = ctx.api();

    match &args.command {
        EventsCommand::List {
            status,
            category,
            search,
        } => {
            let filters = EventFilters {
                status: status.as_deref().map(str::parse).transpose()?,
                category: category.clone(),
                search: search.clone(),
            };
            let events = api.events(&filters).await?;
            match ctx.format {
                output::OutputFormat::Json => output::print_json(&events),
                output::OutputFormat::Table => {
                    let rows: Vec<EventRow> = events.iter().map(EventRow::from).collect();
                    output::print_list(&rows, ctx.format);
                }
            }
        }
        EventsCommand::Show { id } => {
            let event = api.event(&EventId::from(id.as_str())).await?;
            match ctx.format {
                output::OutputFormat::Json => output::print_json(&event),
                output::OutputFormat::Table => {
                    output::print_item(&EventRow::from(&event), ctx.format);
                    if !event.description.is_empty() {
                        println!("{}", event.description);
                    }
                    if let Some(reason) = &event.rejection_reason {
                        output::print_kv("Rejection reason", reason);
                    }
                }
            }
        }
        EventsCommand::Create {
            title,
            description,
            date,
            location,
            poster,
        } => {
            ctx.require(&[Role::Coordinator])?;
            let event = api
                .create_event(&NewEvent {
                    title: title.clone(),
                    description: description.clone(),
                    date: date.clone(),
                    location: location.clone(),
                    poster: poster.clone(),
                })
                .await?;
            output::print_success(&format!("Event '{}' submitted for approval", event.title));
            output::print_item(&EventRow::from(&event), ctx.format);
        }
        EventsCommand::Approve { id } => {
            ctx.require(MODERATORS)?;
            let receipt = api
                .decide_event(&EventId::from(id.as_str()), &EventDecision::approve())
                .await?;
            output::print_success(&receipt_text(&receipt.message, "Event approved"));
        }
        EventsCommand::Reject { id, reason } => {
            ctx.require(MODERATORS)?;
            if reason.trim().is_empty() {
                return Err(AppError::validation("A rejection reason is required"));
            }
            let receipt = api
                .decide_event(&EventId::from(id.as_str()), &EventDecision::reject(reason))
                .await?;
            output::print_success(&receipt_text(&receipt.message, "Event rejected"));
        }
        EventsCommand::Status { id, status } => {
            ctx.require(&[Role::Coordinator, Role::Faculty, Role::HeadFaculty])?;
            let status: EventStatus = status.parse()?;
            let receipt = api
                .set_event_status(&EventId::from(id.as_str()), &status)
                .await?;
            output::print_success(&receipt_text(
                &receipt.message,
                &format!("Event status set to {status}"),
            ));
        }
        EventsCommand::Delete { id, yes } => {
            ctx.require(MODERATORS)?;
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete event {id}? This cannot be undone"))
                    .default(false)
                    .interact()
                    .map_err(input_error)?;
                if !confirm {
                    output::print_warning("Cancelled");
                    return Ok(());
                }
            }
            api.delete_event(&EventId::from(id.as_str())).await?;
            output::print_success(&format!("Event {id} deleted"));
        }
    }

    Ok(())
}

/// Server message when present, else the local one.
pub fn receipt_text(server: &str, fallback: &str) -> String {
    if server.trim().is_empty() {
        fallback.to_string()
    } else {
        server.to_string()
    }
}
