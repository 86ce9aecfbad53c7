//! Output formatting helpers.

use anyhow::{Result, anyhow};
use colored::Colorize;
use serde::Serialize;

use coursekit_core::{GENERIC_ERROR_MESSAGE, Outcome, SESSION_EXPIRED_MESSAGE};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dimmed hint on stderr.
pub fn hint(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Unwrap a successful outcome or turn the failure into the command error.
///
/// An application error surfaces the server message; an invalid session
/// asks the user to sign in again.
pub fn settle<T>(outcome: Outcome<T>) -> Result<T> {
    match outcome {
        Outcome::Success(value) => Ok(value),
        Outcome::RetryableExpiry(_) => Err(anyhow!(GENERIC_ERROR_MESSAGE)),
        Outcome::ApplicationError(failure) => Err(anyhow!(failure.message)),
        Outcome::SessionInvalid => {
            hint("Run `coursekit login` to sign in.");
            Err(anyhow!(SESSION_EXPIRED_MESSAGE))
        }
    }
}

/// Print the confirmation carried by a response, or a fallback.
pub fn confirm(message: Option<&str>, fallback: &str) {
    success(message.filter(|m| !m.trim().is_empty()).unwrap_or(fallback));
}
