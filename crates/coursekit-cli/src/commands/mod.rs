//! Subcommand implementations.

pub mod account;
pub mod admin;
pub mod auth;
pub mod catalog;

use anyhow::Result;

use crate::cli::Commands;
use crate::context::AppContext;

pub async fn handle(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Login(args) => auth::login(args, ctx).await,
        Commands::Register(args) => auth::register(args, ctx).await,
        Commands::Verify(args) => auth::verify(args, ctx).await,
        Commands::ResendCode(args) => auth::resend_code(args, ctx).await,
        Commands::ForgotPassword(args) => auth::forgot_password(args, ctx).await,
        Commands::RecoverPassword(args) => auth::recover_password(args, ctx).await,
        Commands::Logout => auth::logout(ctx),
        Commands::Whoami(args) => account::whoami(args, ctx).await,
        Commands::Courses(args) => catalog::courses(args, ctx).await,
        Commands::Profile(cmd) => account::handle(cmd, ctx).await,
        Commands::Admin(cmd) => admin::handle(cmd, ctx).await,
    }
}
