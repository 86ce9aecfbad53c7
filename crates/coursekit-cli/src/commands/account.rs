//! Commands for the signed-in user's own account.

use anyhow::Result;
use clap::{Args, Subcommand};

use coursekit_core::models::{EmailChange, PasswordChange, ProfileEdit};

use crate::commands::auth::print_user;
use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Change name, last name and username
    Edit(EditArgs),

    /// Change the account email
    Email(EmailArgs),

    /// Change the account password
    Password(PasswordArgs),
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub username: String,
}

#[derive(Args, Debug)]
pub struct EmailArgs {
    /// The new email address
    #[arg(long)]
    pub email: String,

    /// Current password
    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct PasswordArgs {
    /// Current password
    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub new_password: String,
}

pub async fn handle(cmd: ProfileCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        ProfileSubcommand::Edit(args) => edit(args, ctx).await,
        ProfileSubcommand::Email(args) => email(args, ctx).await,
        ProfileSubcommand::Password(args) => password(args, ctx).await,
    }
}

pub async fn whoami(args: WhoamiArgs, ctx: &AppContext) -> Result<()> {
    let user = output::settle(ctx.courseware()?.restore().await?)?;

    if args.json {
        output::json_pretty(&user)
    } else {
        print_user(&user);
        Ok(())
    }
}

async fn edit(args: EditArgs, ctx: &AppContext) -> Result<()> {
    let form = ProfileEdit {
        name: args.name,
        last_name: args.last_name,
        username: args.username,
    };
    form.validate()?;

    let payload = output::settle(ctx.courseware()?.edit_profile(&form).await?)?;
    output::confirm(payload.message.as_deref(), "Profile updated");
    Ok(())
}

async fn email(args: EmailArgs, ctx: &AppContext) -> Result<()> {
    let form = EmailChange {
        email: args.email,
        password: args.password,
    };
    form.validate()?;

    let payload = output::settle(ctx.courseware()?.edit_email(&form).await?)?;
    output::confirm(payload.message.as_deref(), "Email updated");
    if let Some(email) = payload.data.email {
        output::field("Email", &email);
    }
    Ok(())
}

async fn password(args: PasswordArgs, ctx: &AppContext) -> Result<()> {
    let form = PasswordChange {
        password: args.password,
        new_password: args.new_password,
    };
    form.validate()?;

    let payload = output::settle(ctx.courseware()?.edit_password(&form).await?)?;
    output::confirm(payload.message.as_deref(), "Password updated");
    Ok(())
}
