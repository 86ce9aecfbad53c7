//! Client-side form validation.
//!
//! These checks run before a request is sent so that obviously bad input
//! never costs a round trip. The backend stays authoritative; passing
//! validation does not guarantee the server will accept the form.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::InvalidInputError;

/// Longest email address accepted by the forms.
pub const EMAIL_MAX_LEN: usize = 250;
/// Minimum password length.
pub const PASSWORD_MIN_LEN: usize = 8;
/// Allowed username length range.
pub const USERNAME_LEN: (usize, usize) = (4, 20);
/// Allowed length range for first and last names.
pub const NAME_LEN: (usize, usize) = (3, 30);
/// Longest course or class title.
pub const TITLE_MAX_LEN: usize = 50;
/// Longest course slug.
pub const SLUG_MAX_LEN: usize = 20;
/// Shortest plausible video URL.
pub const VIDEO_URL_MIN_LEN: usize = 7;
/// Exact length of an emailed verification code.
pub const VERIFICATION_CODE_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}$").expect("email pattern compiles")
});

static ALPHANUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]*$").expect("alphanumeric pattern compiles"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z-]+$").expect("slug pattern compiles"));

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Validate an email address.
pub fn email(value: &str) -> Result<(), InvalidInputError> {
    if char_len(value) > EMAIL_MAX_LEN || !EMAIL_RE.is_match(value) {
        return Err(InvalidInputError::Email {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validate a password typed at login. Only the length is checked so that
/// accounts created under older rules can still sign in.
pub fn login_password(value: &str) -> Result<(), InvalidInputError> {
    if char_len(value) < PASSWORD_MIN_LEN {
        return Err(InvalidInputError::Password {
            reason: format!("must be at least {} characters", PASSWORD_MIN_LEN),
        });
    }
    Ok(())
}

/// Validate a password being set: length, one uppercase letter, one digit.
pub fn new_password(value: &str) -> Result<(), InvalidInputError> {
    login_password(value)?;

    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(InvalidInputError::Password {
            reason: "must contain an uppercase letter".to_string(),
        });
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(InvalidInputError::Password {
            reason: "must contain a digit".to_string(),
        });
    }
    Ok(())
}

/// Validate a username: ASCII letters and digits only.
pub fn username(value: &str) -> Result<(), InvalidInputError> {
    if !ALPHANUMERIC_RE.is_match(value) {
        return Err(InvalidInputError::Username {
            value: value.to_string(),
            reason: "only letters and digits are allowed".to_string(),
        });
    }

    let (min, max) = USERNAME_LEN;
    let len = char_len(value);
    if len < min || len > max {
        return Err(InvalidInputError::Username {
            value: value.to_string(),
            reason: format!("must be between {} and {} characters", min, max),
        });
    }
    Ok(())
}

/// Validate a first or last name.
pub fn name(field: &'static str, value: &str) -> Result<(), InvalidInputError> {
    let (min, max) = NAME_LEN;
    length(field, value, min, max)
}

/// Validate that `value` has between `min` and `max` characters.
pub fn length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), InvalidInputError> {
    let len = char_len(value);
    if len < min || len > max {
        let reason = if min == max {
            format!("must be exactly {} characters", min)
        } else {
            format!("must be between {} and {} characters", min, max)
        };
        return Err(InvalidInputError::Field { field, reason });
    }
    Ok(())
}

/// Validate that a field is not blank.
pub fn required(field: &'static str, value: &str) -> Result<(), InvalidInputError> {
    if value.trim().is_empty() {
        return Err(InvalidInputError::Field {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Validate a course or class title.
pub fn title(value: &str) -> Result<(), InvalidInputError> {
    required("title", value)?;
    length("title", value, 1, TITLE_MAX_LEN)
}

/// Validate a course URL slug: lowercase letters and dashes.
pub fn slug(value: &str) -> Result<(), InvalidInputError> {
    if !SLUG_RE.is_match(value) {
        return Err(InvalidInputError::Field {
            field: "slug",
            reason: "only lowercase letters and '-' are allowed".to_string(),
        });
    }
    length("slug", value, 1, SLUG_MAX_LEN)
}

/// Validate a class video URL.
pub fn video_url(value: &str) -> Result<(), InvalidInputError> {
    if char_len(value.trim()) < VIDEO_URL_MIN_LEN {
        return Err(InvalidInputError::Field {
            field: "video URL",
            reason: format!("must be at least {} characters", VIDEO_URL_MIN_LEN),
        });
    }
    Ok(())
}

/// Validate an emailed verification code.
pub fn verification_code(value: &str) -> Result<(), InvalidInputError> {
    if char_len(value) != VERIFICATION_CODE_LEN {
        return Err(InvalidInputError::VerificationCode {
            reason: format!("must be exactly {} characters", VERIFICATION_CODE_LEN),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert!(email("ada@example.com").is_ok());
        assert!(email("ADA.L+dev@Example.ORG").is_ok());
        assert!(email("ada@e.c").is_err());
        assert!(email("ada@examplecom").is_err());
        assert!(email("not-an-email").is_err());
        assert!(email("").is_err());

        let long = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN));
        assert!(email(&long).is_err());
    }

    #[test]
    fn new_password_requires_upper_and_digit() {
        assert!(new_password("Sup3rsecret").is_ok());
        assert!(new_password("Short1").is_err());
        assert!(new_password("alllowercase1").is_err());
        assert!(new_password("NoDigitsHere").is_err());
    }

    #[test]
    fn login_password_only_checks_length() {
        assert!(login_password("lowercase").is_ok());
        assert!(login_password("seven77").is_err());
    }

    #[test]
    fn username_rules() {
        assert!(username("ada1815").is_ok());
        assert!(username("ada").is_err());
        assert!(username("ada_lovelace").is_err());
        assert!(username(&"a".repeat(21)).is_err());
    }

    #[test]
    fn name_rules() {
        assert!(name("name", "Ada").is_ok());
        assert!(name("name", "Al").is_err());
        assert!(name("last name", &"x".repeat(31)).is_err());
    }

    #[test]
    fn slug_rules() {
        assert!(slug("intro-to-rust").is_ok());
        assert!(slug("Intro").is_err());
        assert!(slug("intro_rust").is_err());
        assert!(slug("").is_err());
        assert!(slug(&"a".repeat(21)).is_err());
    }

    #[test]
    fn class_field_rules() {
        assert!(title("Ownership").is_ok());
        assert!(title("   ").is_err());
        assert!(title(&"t".repeat(51)).is_err());
        assert!(video_url("https://v.example/1").is_ok());
        assert!(video_url("http:/").is_err());
    }

    #[test]
    fn verification_code_is_six_chars() {
        assert!(verification_code("123456").is_ok());
        assert!(verification_code("12345").is_err());
        assert!(verification_code("1234567").is_err());
    }
}
