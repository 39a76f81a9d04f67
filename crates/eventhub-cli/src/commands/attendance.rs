//! Attendance commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use eventhub_api::models::{AttendanceFilters, AttendanceMark, AttendanceRecord, Ref};
use eventhub_core::error::AppError;
use eventhub_core::types::{EventId, Role, UserId};

use super::Context;
use super::events::receipt_text;
use crate::output;

const STAFF: &[Role] = &[Role::Coordinator, Role::Faculty, Role::HeadFaculty];

/// Arguments for attendance commands
#[derive(Debug, Args)]
pub struct AttendanceArgs {
    /// Attendance subcommand
    #[command(subcommand)]
    pub command: AttendanceCommand,
}

/// Attendance subcommands
#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    /// Mark a student present or absent
    Mark {
        /// Event ID
        event_id: String,
        /// Student user ID
        student_id: String,
        /// Mark absent instead of present
        #[arg(long)]
        absent: bool,
    },
    /// Download the attendance export
    Download {
        /// Restrict to one event
        #[arg(long)]
        event: Option<String>,
        /// Write the export to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List attendance for an event
    Event {
        /// Event ID
        event_id: String,
    },
}

/// Attendance display row for table output
#[derive(Debug, Serialize, Tabled)]
struct AttendanceRow {
    /// Student
    student: String,
    /// Student number
    student_id: String,
    /// Present
    present: String,
}

impl From<&AttendanceRecord> for AttendanceRow {
    fn from(record: &AttendanceRecord) -> Self {
        let (student, student_id) = match &record.student {
            Some(Ref::Populated(p)) => (p.full_name.clone(), output::or_dash(p.student_id.as_deref())),
            Some(Ref::Id(id)) => (id.clone(), "-".to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        Self {
            student,
            student_id,
            present: if record.is_present { "yes" } else { "no" }.to_string(),
        }
    }
}

/// Execute attendance commands
pub async fn execute(args: &AttendanceArgs, ctx: &Context) -> Result<(), AppError> {
    ctx.require(STAFF)?;
    let api = ctx.api();

    match &args.command {
        AttendanceCommand::Mark {
            event_id,
            student_id,
            absent,
        } => {
            let receipt = api
                .mark_attendance(&AttendanceMark {
                    student_id: UserId::from(student_id.as_str()),
                    event_id: EventId::from(event_id.as_str()),
                    is_present: !absent,
                })
                .await?;
            let state = if *absent { "absent" } else { "present" };
            output::print_success(&receipt_text(
                &receipt.message,
                &format!("Marked {student_id} {state}"),
            ));
        }
        AttendanceCommand::Download { event, output: path } => {
            let filters = AttendanceFilters {
                event_id: event.as_deref().map(EventId::from),
            };
            let export = api.download_attendance(&filters).await?;
            match path {
                Some(path) => {
                    let json = serde_json::to_vec_pretty(&export.data)?;
                    tokio::fs::write(path, json).await?;
                    output::print_success(&format!("Attendance written to {}", path.display()));
                }
                None => output::print_json(&export.data),
            }
        }
        AttendanceCommand::Event { event_id } => {
            let rows: Vec<AttendanceRow> = api
                .event_attendance(&EventId::from(event_id.as_str()))
                .await?
                .iter()
                .map(AttendanceRow::from)
                .collect();
            output::print_list(&rows, ctx.format);
        }
    }

    Ok(())
}
