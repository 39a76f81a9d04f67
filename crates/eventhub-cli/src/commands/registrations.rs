//! Registration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use eventhub_api::models::{Ref, Registration};
use eventhub_core::error::AppError;
use eventhub_core::types::{EventId, RegistrationId, Role};

use super::Context;
use super::events::receipt_text;
use crate::output;

/// Arguments for registration commands
#[derive(Debug, Args)]
pub struct RegistrationsArgs {
    /// Registration subcommand
    #[command(subcommand)]
    pub command: RegistrationsCommand,
}

/// Registration subcommands
#[derive(Debug, Subcommand)]
pub enum RegistrationsCommand {
    /// List your registrations
    My,
    /// Register for an event
    Add {
        /// Event ID
        event_id: String,
    },
    /// Cancel a registration
    Cancel {
        /// Registration ID
        id: String,
    },
    /// List registrations for an event (staff)
    Event {
        /// Event ID
        event_id: String,
    },
}

/// Registration display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RegistrationRow {
    /// Registration ID
    id: String,
    /// Event
    event: String,
    /// Student
    student: String,
    /// Status
    status: String,
    /// Registered at
    registered: String,
}

impl From<&Registration> for RegistrationRow {
    fn from(r: &Registration) -> Self {
        let student = match &r.student {
            Some(Ref::Populated(p)) => p.full_name.clone(),
            Some(Ref::Id(id)) => id.clone(),
            None => "-".to_string(),
        };
        let event = match (&r.event, r.event_title()) {
            (_, Some(title)) => title.to_string(),
            (Some(Ref::Id(id)), None) => id.clone(),
            _ => "-".to_string(),
        };
        Self {
            id: r.id.to_string(),
            event,
            student,
            status: output::or_dash(r.status.as_deref()),
            registered: r
                .registration_date
                .as_ref()
                .map(output::timestamp)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute registration commands
pub async fn execute(args: &RegistrationsArgs, ctx: &Context) -> Result<(), AppError> {
    let api = ctx.api();

    match &args.command {
        RegistrationsCommand::My => {
            ctx.require(&[])?;
            let rows: Vec<RegistrationRow> = api
                .my_registrations()
                .await?
                .iter()
                .map(RegistrationRow::from)
                .collect();
            output::print_list(&rows, ctx.format);
        }
        RegistrationsCommand::Add { event_id } => {
            ctx.require(&[Role::Student])?;
            let receipt = api
                .register_for_event(&EventId::from(event_id.as_str()))
                .await?;
            output::print_success(&receipt_text(&receipt.message, "Registered for event"));
        }
        RegistrationsCommand::Cancel { id } => {
            ctx.require(&[])?;
            api.cancel_registration(&RegistrationId::from(id.as_str()))
                .await?;
            output::print_success(&format!("Registration {id} cancelled"));
        }
        RegistrationsCommand::Event { event_id } => {
            ctx.require(&[Role::Coordinator, Role::Faculty, Role::HeadFaculty])?;
            let rows: Vec<RegistrationRow> = api
                .event_registrations(&EventId::from(event_id.as_str()))
                .await?
                .iter()
                .map(RegistrationRow::from)
                .collect();
            output::print_list(&rows, ctx.format);
        }
    }

    Ok(())
}
