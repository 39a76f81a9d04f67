//! Session commands: login, logout, register, whoami.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use eventhub_core::error::AppError;
use eventhub_core::types::{Identity, RegistrationForm, Role};

use super::{Context, input_error};
use crate::output;

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email
    pub email: String,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for `register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    pub name: String,
    /// Account email
    #[arg(long)]
    pub email: String,
    /// Contact number
    #[arg(long)]
    pub contact: String,
    /// Role: student, coordinator, faculty, or headFaculty
    #[arg(long, default_value = "student")]
    pub role: String,
    /// Student roll number
    #[arg(long)]
    pub student_id: Option<String>,
    /// Profile picture to upload
    #[arg(long)]
    pub avatar: Option<PathBuf>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Identity display row
#[derive(Debug, Serialize, Tabled)]
pub struct IdentityRow {
    /// User ID
    pub id: String,
    /// Full name
    pub name: String,
    /// Email
    pub email: String,
    /// Role
    pub role: String,
}

impl From<&Identity> for IdentityRow {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            name: identity.full_name.clone(),
            email: identity.email.clone(),
            role: identity.role.to_string(),
        }
    }
}

fn prompt_password(confirm: bool) -> Result<String, AppError> {
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt.interact().map_err(input_error)
}

/// Sign in with email and password
pub async fn login(args: &LoginArgs, ctx: &Context) -> Result<(), AppError> {
    let password = match &args.password {
        Some(p) => p.clone(),
        None => prompt_password(false)?,
    };
    let identity = ctx.session.login(&args.email, &password).await?;
    output::print_item(&IdentityRow::from(&identity), ctx.format);
    output::print_kv("Home", identity.role.default_route());
    Ok(())
}

/// Sign out
pub async fn logout(ctx: &Context) -> Result<(), AppError> {
    if !ctx.session.state().is_authenticated() {
        output::print_warning("Not logged in");
        return Ok(());
    }
    ctx.session.logout().await
}

/// Create an account; does not sign in
pub async fn register(args: &RegisterArgs, ctx: &Context) -> Result<(), AppError> {
    let role: Role = args.role.parse()?;
    let password = match &args.password {
        Some(p) => p.clone(),
        None => prompt_password(true)?,
    };

    let form = RegistrationForm {
        full_name: args.name.clone(),
        email: args.email.clone(),
        contact_number: args.contact.clone(),
        password,
        role,
        student_id: args.student_id.clone(),
        avatar: args.avatar.clone(),
    };
    ctx.session.register(&form).await?;
    output::print_kv("Next", "eventhub login <email>");
    Ok(())
}

/// Show the signed-in user
pub fn whoami(ctx: &Context) -> Result<(), AppError> {
    match ctx.session.state().identity() {
        Some(identity) => output::print_item(&IdentityRow::from(identity), ctx.format),
        None => output::print_warning("Not logged in"),
    }
    Ok(())
}
