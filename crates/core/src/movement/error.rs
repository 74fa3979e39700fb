//! Movement error types.

use gestion_shared::AppError;
use thiserror::Error;

use super::account::DirectoryError;
use super::gate::DenyReason;
use crate::storage::StorageError;

/// Failures reported by a movement repository.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The write conflicts with existing data.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(String),
}

impl RepositoryError {
    /// Create a database error.
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

fn join_reasons(reasons: &[DenyReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while submitting or reading movements.
#[derive(Debug, Error)]
pub enum MovementError {
    /// The posting gate denied the movement.
    #[error("Movement rejected: {}", join_reasons(.0))]
    Rejected(Vec<DenyReason>),

    /// Accounts could not be loaded.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// An attachment could not be stored or read.
    #[error("Attachment error: {0}")]
    Storage(#[from] StorageError),

    /// The repository failed.
    #[error("Persistence error: {0}")]
    Repository(#[from] RepositoryError),

    /// Movement id does not exist.
    #[error("Movement not found: {0}")]
    NotFound(String),
}

impl MovementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "MOVEMENT_REJECTED",
            Self::Directory(_) => "DIRECTORY_UNAVAILABLE",
            Self::Storage(e) if e.is_rejected_upload() => "ATTACHMENT_REJECTED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Repository(_) => "PERSISTENCE_ERROR",
            Self::NotFound(_) => "MOVEMENT_NOT_FOUND",
        }
    }

    /// Deny reasons, empty unless `Rejected`.
    #[must_use]
    pub fn reasons(&self) -> &[DenyReason] {
        match self {
            Self::Rejected(reasons) => reasons,
            _ => &[],
        }
    }
}

impl From<MovementError> for AppError {
    fn from(err: MovementError) -> Self {
        let message = err.to_string();
        match err {
            MovementError::Rejected(_) => Self::BusinessRule(message),
            MovementError::Storage(e) if e.is_rejected_upload() => Self::Validation(message),
            MovementError::Storage(_) => Self::Storage(message),
            MovementError::Directory(_) => Self::Database(message),
            MovementError::Repository(RepositoryError::Conflict(_)) => Self::Conflict(message),
            MovementError::Repository(RepositoryError::NotFound(_)) | MovementError::NotFound(_) => {
                Self::NotFound(message)
            }
            MovementError::Repository(RepositoryError::Database(_)) => Self::Database(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rejected_message_lists_reasons() {
        let err = MovementError::Rejected(vec![
            DenyReason::InvalidTimestamp,
            DenyReason::Unbalanced {
                difference: dec!(12.5),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Movement rejected: timestamp must be dd/mm/YYYY HH:MM:SS; \
             total debit must equal total credit (difference 12.50)"
        );
        assert_eq!(err.reasons().len(), 2);
        assert_eq!(err.error_code(), "MOVEMENT_REJECTED");
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = MovementError::Rejected(vec![DenyReason::ConfirmationRequired]).into();
        assert!(matches!(app, AppError::BusinessRule(_)));
        assert!(app.is_user_recoverable());

        let app: AppError = MovementError::Storage(StorageError::too_large(20, 10)).into();
        assert!(matches!(app, AppError::Validation(_)));

        let app: AppError = MovementError::Repository(RepositoryError::database("down")).into();
        assert_eq!(app.error_code(), "DATABASE_ERROR");

        let app: AppError = MovementError::NotFound("x".into()).into();
        assert_eq!(app.error_code(), "NOT_FOUND");
    }
}
