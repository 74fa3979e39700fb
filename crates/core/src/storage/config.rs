//! Storage configuration types.

use std::path::PathBuf;

use gestion_shared::config::StorageSettings;
use serde::{Deserialize, Serialize};

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// Local filesystem.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// Process memory. Contents vanish with the process.
    Memory,
}

impl StorageProvider {
    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types for upload. Empty accepts anything.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Vec::new(),
        }
    }

    /// Builds a local filesystem config from application settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(StorageProvider::local_fs(&settings.uploads_dir))
            .with_max_file_size(settings.max_file_size)
            .with_allowed_mime_types(settings.allowed_mime_types.clone())
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set allowed MIME types.
    #[must_use]
    pub fn with_allowed_mime_types(mut self, types: Vec<String>) -> Self {
        self.allowed_mime_types = types;
        self
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.is_empty()
            || self
                .allowed_mime_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(mime_type))
    }
}
