//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use chrono::NaiveDateTime;
use gestion_shared::types::LineId;
use opendal::{ErrorKind, Operator, services};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// A file picked for a movement line, held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineUpload {
    /// Original filename.
    pub filename: String,
    /// Content type (MIME type).
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

impl LineUpload {
    /// Creates an upload.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// File size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Request to store one line's attachment.
#[derive(Debug, Clone, Copy)]
pub struct StoreRequest<'a> {
    /// Submission time used in the key.
    pub stamp: NaiveDateTime,
    /// 1-based line position.
    pub position: usize,
    /// Line the file belongs to.
    pub line_id: LineId,
    /// The file.
    pub upload: &'a LineUpload,
}

/// A file that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Storage key.
    pub key: String,
    /// File size in bytes.
    pub size: u64,
}

/// Storage service for line attachments.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish(),
        };
        Ok(operator)
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::unsupported_type(content_type));
        }

        Ok(())
    }

    /// Generate storage key for a line attachment.
    ///
    /// Format: `mov_{YYYYmmdd_HHMMSS}_linea_{position}_{line_id}_{sanitized_filename}`
    #[must_use]
    pub fn generate_storage_key(req: &StoreRequest<'_>) -> String {
        format!(
            "mov_{}_linea_{}_{}_{}",
            req.stamp.format("%Y%m%d_%H%M%S"),
            req.position,
            req.line_id,
            sanitize_filename(&req.upload.filename)
        )
    }

    /// Validates and writes a line attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected or the write fails.
    pub async fn store(&self, req: &StoreRequest<'_>) -> Result<StoredFile, StorageError> {
        self.validate_upload(&req.upload.content_type, req.upload.size())?;

        let key = Self::generate_storage_key(req);
        self.operator.write(&key, req.upload.data.clone()).await?;

        tracing::debug!(key = %key, size = req.upload.size(), "Stored attachment");
        Ok(StoredFile {
            key,
            size: req.upload.size(),
        })
    }

    /// Reads a stored file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key does not exist.
    pub async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        match self.operator.read(key).await {
            Ok(buffer) => Ok(buffer.to_bytes()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::missing(key)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a file from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Sanitize filename for storage key.
///
/// Spaces become underscores; anything other than ASCII alphanumerics, dots,
/// hyphens and underscores is dropped. An empty result becomes `archivo`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect();

    if sanitized.is_empty() {
        "archivo".to_string()
    } else {
        sanitized
    }
}
