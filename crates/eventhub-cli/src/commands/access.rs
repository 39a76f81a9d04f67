//! Route access checks against the persisted session.

use clap::Args;

use eventhub_core::error::AppError;
use eventhub_session::decide;

use super::{Context, parse_roles};
use crate::output;

/// Arguments for `access`
#[derive(Debug, Args)]
pub struct AccessArgs {
    /// Role allowed on the page (repeatable; none means any signed-in user)
    #[arg(short, long = "role")]
    pub roles: Vec<String>,
}

/// Decide whether the signed-in user may open a page restricted to `--role`
pub fn execute(args: &AccessArgs, ctx: &Context) -> Result<(), AppError> {
    let roles = parse_roles(&args.roles)?;
    let decision = decide(&ctx.session.state(), &roles)
        .map_err(|unresolved| AppError::internal(unresolved.to_string()))?;

    match ctx.format {
        output::OutputFormat::Json => output::print_json(&decision),
        output::OutputFormat::Table => {
            if decision.is_allowed() {
                output::print_success("Access granted");
            } else if let Some(notice) = decision.notice() {
                output::print_warning(notice);
            }
            if let Some(target) = decision.redirect() {
                output::print_kv("Redirect to", &target.path());
            }
        }
    }
    Ok(())
}
