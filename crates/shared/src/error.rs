//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to the entry and query screens.
#[derive(Debug, Error)]
pub enum AppError {
    /// Movement, line or attachment not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input the user can correct, such as an oversized attachment.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The posting gate refused the movement.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// A stored row clashes with the one being written.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Attachment storage error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Returns the stable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true if the user can fix the problem and try again.
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::BusinessRule(_) | Self::Conflict(_)
        )
    }
}
