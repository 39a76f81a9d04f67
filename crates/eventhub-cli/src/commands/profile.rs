//! Profile commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use eventhub_api::models::ProfileUpdate;
use eventhub_core::error::AppError;

use super::Context;
use super::auth::IdentityRow;
use crate::output;

/// Arguments for profile commands
#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Profile subcommand
    #[command(subcommand)]
    pub command: ProfileCommand,
}

/// Profile subcommands
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Fetch your profile from the server
    Show,
    /// Update profile fields
    Update {
        /// New full name
        #[arg(long)]
        name: Option<String>,
        /// New contact number
        #[arg(long)]
        contact: Option<String>,
        /// New profile picture
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

/// Execute profile commands
pub async fn execute(args: &ProfileArgs, ctx: &Context) -> Result<(), AppError> {
    ctx.require(&[])?;
    let api = ctx.api();

    match &args.command {
        ProfileCommand::Show => {
            let identity = api.profile().await?;
            output::print_item(&IdentityRow::from(&identity), ctx.format);
        }
        ProfileCommand::Update {
            name,
            contact,
            avatar,
        } => {
            let update = ProfileUpdate {
                full_name: name.clone(),
                contact_number: contact.clone(),
                avatar: avatar.clone(),
            };
            if update.is_empty() {
                return Err(AppError::validation(
                    "Nothing to update: pass --name, --contact, or --avatar",
                ));
            }
            let identity = api.update_profile(&update).await?;
            output::print_success("Profile updated");
            output::print_item(&IdentityRow::from(&identity), ctx.format);
        }
    }

    Ok(())
}
