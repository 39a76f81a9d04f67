//! Review commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use eventhub_api::models::{Ref, Review, ReviewSubmission};
use eventhub_core::error::AppError;
use eventhub_core::types::{EventId, ReviewId};

use super::{Context, input_error};
use super::events::receipt_text;
use crate::output;

/// Arguments for review commands
#[derive(Debug, Args)]
pub struct ReviewsArgs {
    /// Review subcommand
    #[command(subcommand)]
    pub command: ReviewsCommand,
}

/// Review subcommands
#[derive(Debug, Subcommand)]
pub enum ReviewsCommand {
    /// List reviews of an event
    List {
        /// Event ID
        event_id: String,
    },
    /// List your reviews
    Mine,
    /// Review an event you attended
    Submit {
        /// Event ID
        event_id: String,
        /// Rating from 1 to 5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        /// Review text
        #[arg(short, long)]
        content: String,
        /// Feedback category
        #[arg(long, default_value = "general")]
        category: String,
        /// Files to attach (repeatable)
        #[arg(short, long = "attach")]
        attachments: Vec<PathBuf>,
    },
    /// Delete one of your reviews
    Delete {
        /// Review ID
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Review display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ReviewRow {
    /// Review ID
    id: String,
    /// Event
    event: String,
    /// Rating
    rating: String,
    /// Category
    category: String,
    /// Review text
    content: String,
}

impl From<&Review> for ReviewRow {
    fn from(review: &Review) -> Self {
        let event = match &review.event {
            Some(Ref::Populated(e)) => e.title.clone(),
            Some(Ref::Id(id)) => id.clone(),
            None => "-".to_string(),
        };
        Self {
            id: review.id.to_string(),
            event,
            rating: review
                .rating
                .map(|r| "★".repeat(usize::from(r)))
                .unwrap_or_else(|| "-".to_string()),
            category: output::or_dash(review.category.as_deref()),
            content: review.content.clone(),
        }
    }
}

/// Execute review commands
pub async fn execute(args: &ReviewsArgs, ctx: &Context) -> Result<(), AppError> {
    ctx.require(&[])?;
    let api = ctx.api();

    match &args.command {
        ReviewsCommand::List { event_id } => {
            let reviews = api.event_reviews(&EventId::from(event_id.as_str())).await?;
            let rows: Vec<ReviewRow> = reviews.iter().map(ReviewRow::from).collect();
            output::print_list(&rows, ctx.format);
        }
        ReviewsCommand::Mine => {
            let rows: Vec<ReviewRow> = api.my_reviews().await?.iter().map(ReviewRow::from).collect();
            output::print_list(&rows, ctx.format);
        }
        ReviewsCommand::Submit {
            event_id,
            rating,
            content,
            category,
            attachments,
        } => {
            if content.trim().is_empty() {
                return Err(AppError::validation("Review text must not be empty"));
            }
            let receipt = api
                .submit_review(
                    &EventId::from(event_id.as_str()),
                    &ReviewSubmission {
                        rating: *rating,
                        content: content.clone(),
                        category: category.clone(),
                        attachments: attachments.clone(),
                    },
                )
                .await?;
            output::print_success(&receipt_text(&receipt.message, "Review submitted"));
        }
        ReviewsCommand::Delete { id, yes } => {
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete review {id}?"))
                    .default(false)
                    .interact()
                    .map_err(input_error)?;
                if !confirm {
                    output::print_warning("Cancelled");
                    return Ok(());
                }
            }
            api.delete_review(&ReviewId::from(id.as_str())).await?;
            output::print_success(&format!("Review {id} deleted"));
        }
    }

    Ok(())
}
