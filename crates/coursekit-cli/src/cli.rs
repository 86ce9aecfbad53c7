//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::account::{ProfileCommand, WhoamiArgs};
use crate::commands::admin::AdminCommand;
use crate::commands::auth::{EmailArgs, LoginArgs, RecoverPasswordArgs, RegisterArgs, VerifyArgs};
use crate::commands::catalog::CoursesArgs;

/// Command-line client for the coursekit course platform.
#[derive(Parser, Debug)]
#[command(name = "coursekit")]
#[command(author, version = env!("COURSEKIT_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to reach the backend and where to keep the tokens.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Backend base URL
    #[arg(long, env = "COURSEKIT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Credential file (defaults to the platform data directory)
    #[arg(long, env = "COURSEKIT_CREDENTIALS", global = true)]
    pub credentials: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with email and password
    Login(LoginArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Confirm an account with the emailed code and sign in
    Verify(VerifyArgs),

    /// Send a new verification code
    ResendCode(EmailArgs),

    /// Request a password recovery code
    ForgotPassword(EmailArgs),

    /// Set a new password with a recovery code
    RecoverPassword(RecoverPasswordArgs),

    /// Sign out and delete stored credentials
    Logout,

    /// Display the signed-in user
    Whoami(WhoamiArgs),

    /// List the course catalog
    Courses(CoursesArgs),

    /// Manage your own account
    Profile(ProfileCommand),

    /// Administration (admin accounts only)
    Admin(AdminCommand),
}
