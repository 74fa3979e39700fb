//! Checks on user administration input.

use thiserror::Error;

use super::Role;

/// Rejected user administration input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserInputError {
    /// Login name is blank.
    #[error("username is required")]
    MissingUsername,

    /// Password is blank or the confirmation differs.
    #[error("passwords do not match or are empty")]
    PasswordMismatch,
}

impl UserInputError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingUsername => "MISSING_USERNAME",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
        }
    }
}

/// Form data for a new user.
#[derive(Debug, Clone)]
pub struct NewUserInput {
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: Option<String>,
    /// Password.
    pub password: String,
    /// Password typed again.
    pub confirmation: String,
    /// Role.
    pub role: Role,
    /// Whether the user may log in.
    pub active: bool,
}

/// A new user that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNewUser {
    /// Trimmed login name.
    pub username: String,
    /// Trimmed display name, `None` when blank.
    pub full_name: Option<String>,
    /// Role.
    pub role: Role,
    /// Whether the user may log in.
    pub active: bool,
}

/// Checks a password and its confirmation.
pub fn validate_password_reset(password: &str, confirmation: &str) -> Result<(), UserInputError> {
    if password.is_empty() || password != confirmation {
        return Err(UserInputError::PasswordMismatch);
    }
    Ok(())
}

/// Checks new-user input and trims its text fields.
pub fn validate_new_user(input: &NewUserInput) -> Result<ValidNewUser, UserInputError> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(UserInputError::MissingUsername);
    }
    validate_password_reset(&input.password, &input.confirmation)?;

    Ok(ValidNewUser {
        username: username.to_string(),
        full_name: input
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        role: input.role,
        active: input.active,
    })
}
