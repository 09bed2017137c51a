//! Account identity rules: the `me` alias and field validation.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Path alias that resolves to the caller's own account. Never a valid username.
pub const ME_ALIAS: &str = "me";

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 150;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+\z").expect("valid regex"));

/// How an account path segment addresses an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRef {
    /// The literal `me` alias.
    Me,
    Username(String),
}

impl AccountRef {
    pub fn parse(identifier: &str) -> Self {
        if identifier == ME_ALIAS {
            Self::Me
        } else {
            Self::Username(identifier.to_string())
        }
    }
}

/// Validate a username for registration or rename.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username == ME_ALIAS {
        return Err(CoreError::Validation(format!(
            "Username '{ME_ALIAS}' is reserved"
        )));
    }
    if username.is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(CoreError::Validation(
            "Username may contain only letters, digits and @/./+/-/_".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(CoreError::Validation(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate an optional first or last name.
pub fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}
