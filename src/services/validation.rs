use regex::Regex;
use std::sync::LazyLock;

use crate::error::{AuthError, AuthResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Anything shaped like `local@domain.tld`: no whitespace, a single `@` and a
/// dot with text on both sides somewhere after it
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn invalid(message: &str) -> AuthError {
    AuthError::InvalidInput(message.to_string())
}

/// Checks the login form before it reaches the account store
pub fn validate_login(email: &str, password: &str) -> AuthResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(invalid("Please fill in all fields."));
    }
    if !is_valid_email(email) {
        return Err(invalid("Please enter a valid email."));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("Password must be at least 6 characters."));
    }
    Ok(())
}

/// Checks the sign-up form: the login rules plus name and confirmation
pub fn validate_registration(
    email: &str,
    password: &str,
    confirm_password: &str,
    name: &str,
) -> AuthResult<()> {
    if name.trim().is_empty() {
        return Err(invalid("Please enter your name."));
    }
    validate_login(email, password)?;
    if password != confirm_password {
        return Err(invalid("Passwords do not match."));
    }
    Ok(())
}
