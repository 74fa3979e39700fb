//! Errors raised while storing or reading line attachments.

use thiserror::Error;

/// Attachment store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The upload is bigger than `storage.max_file_size`.
    #[error("attachment is {size} bytes, the limit is {max} bytes")]
    TooLarge {
        /// Upload size.
        size: u64,
        /// Configured limit.
        max: u64,
    },

    /// The upload's content type is not in `storage.allowed_mime_types`.
    #[error("attachments of type '{content_type}' are not accepted")]
    UnsupportedType {
        /// Content type sent with the upload.
        content_type: String,
    },

    /// No attachment is stored under this key.
    #[error("attachment not found: {key}")]
    Missing {
        /// Storage key recorded on the movement line.
        key: String,
    },

    /// The uploads directory could not be opened.
    #[error("attachment store is misconfigured: {0}")]
    Configuration(String),

    /// Reading, writing or deleting an attachment failed.
    #[error("attachment store failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Upload over the size limit.
    #[must_use]
    pub fn too_large(size: u64, max: u64) -> Self {
        Self::TooLarge { size, max }
    }

    /// Upload with a content type outside the allow list.
    #[must_use]
    pub fn unsupported_type(content_type: impl Into<String>) -> Self {
        Self::UnsupportedType {
            content_type: content_type.into(),
        }
    }

    /// Nothing stored under `key`.
    #[must_use]
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    /// Bad uploads directory.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns true for errors caused by the uploaded file itself.
    #[must_use]
    pub fn is_rejected_upload(&self) -> bool {
        matches!(self, Self::TooLarge { .. } | Self::UnsupportedType { .. })
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::Missing {
                key: err.to_string(),
            },
            _ => Self::Operation(err.to_string()),
        }
    }
}
