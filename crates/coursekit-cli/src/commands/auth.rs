//! Sign-in, registration and recovery commands.

use anyhow::{Context, Result, anyhow};
use clap::Args;
use colored::Colorize;

use coursekit_core::models::{EmailAddress, LoginForm, PasswordRecovery, Registration, Verification};
use coursekit_core::{Outcome, SESSION_EXPIRED_MESSAGE, UserProfile};

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,

    /// At least 8 characters with an uppercase letter and a digit
    #[arg(long)]
    pub password: String,

    /// Letters and digits, 4 to 20 characters
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub last_name: String,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[arg(long)]
    pub email: String,

    /// The 6-character code from the verification email
    #[arg(long)]
    pub code: String,
}

#[derive(Args, Debug)]
pub struct EmailArgs {
    #[arg(long)]
    pub email: String,
}

#[derive(Args, Debug)]
pub struct RecoverPasswordArgs {
    #[arg(long)]
    pub email: String,

    /// The new password
    #[arg(long)]
    pub password: String,

    /// The 6-character code from the recovery email
    #[arg(long)]
    pub code: String,
}

pub async fn login(args: LoginArgs, ctx: &AppContext) -> Result<()> {
    let form = LoginForm::new(args.email, args.password);
    form.validate()?;

    eprintln!("{}", "Signing in...".dimmed());

    let courseware = ctx.courseware()?;
    match courseware.login(&form).await.context("Failed to sign in")? {
        Outcome::Success(payload) => {
            output::success("Signed in successfully");
            println!();
            print_user(&payload.data);
            Ok(())
        }
        Outcome::ApplicationError(failure) if failure.status == Some(401) => {
            output::hint(&format!(
                "Verify the account first: coursekit verify --email {} --code <CODE>",
                form.email
            ));
            Err(anyhow!(failure.message))
        }
        Outcome::ApplicationError(failure) => Err(anyhow!(failure.message)),
        Outcome::RetryableExpiry(_) | Outcome::SessionInvalid => {
            Err(anyhow!(SESSION_EXPIRED_MESSAGE))
        }
    }
}

pub async fn register(args: RegisterArgs, ctx: &AppContext) -> Result<()> {
    let form = Registration {
        email: args.email,
        password: args.password,
        username: args.username,
        name: args.name,
        last_name: args.last_name,
    };
    form.validate()?;

    let payload = output::settle(ctx.courseware()?.register(&form).await?)?;
    output::confirm(payload.message.as_deref(), "Account created");
    output::hint(&format!(
        "Check {} for a verification code, then run `coursekit verify`.",
        form.email
    ));
    Ok(())
}

pub async fn verify(args: VerifyArgs, ctx: &AppContext) -> Result<()> {
    let form = Verification {
        email: args.email,
        verification_code: args.code,
    };
    form.validate()?;

    let payload = output::settle(ctx.courseware()?.verify(&form).await?)?;
    output::success("Account verified, signed in");
    println!();
    print_user(&payload.data);
    Ok(())
}

pub async fn resend_code(args: EmailArgs, ctx: &AppContext) -> Result<()> {
    let form = EmailAddress::new(args.email);
    form.validate()?;

    let payload = output::settle(ctx.courseware()?.resend_code(&form).await?)?;
    output::confirm(payload.message.as_deref(), "Verification code sent");
    Ok(())
}

pub async fn forgot_password(args: EmailArgs, ctx: &AppContext) -> Result<()> {
    let form = EmailAddress::new(args.email);
    form.validate()?;

    let payload = output::settle(ctx.courseware()?.forgot_password(&form).await?)?;
    output::confirm(payload.message.as_deref(), "Recovery code sent");
    Ok(())
}

pub async fn recover_password(args: RecoverPasswordArgs, ctx: &AppContext) -> Result<()> {
    let form = PasswordRecovery {
        email: args.email,
        password: args.password,
        verification_code: args.code,
    };
    form.validate()?;

    let payload = output::settle(ctx.courseware()?.recover_password(&form).await?)?;
    output::confirm(payload.message.as_deref(), "Password changed");
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session()
        .reset()
        .context("Failed to remove stored credentials")?;
    output::success("Signed out");
    Ok(())
}

pub(crate) fn print_user(user: &UserProfile) {
    output::field("Name", &format!("{} {}", user.name, user.last_name));
    output::field("Username", &user.username);
    output::field("Email", &user.email);
    output::field("Role", user.role.as_str());
}
