//! Attachment storage backed by Apache OpenDAL.
//!
//! Files attached to movement lines are written under a generated key; the key
//! is what gets persisted with the line.
//!
//! ```text
//! mov_<YYYYmmdd_HHMMSS>_linea_<n>_<line id>_<sanitized filename>
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{LineUpload, StorageService, StoreRequest, StoredFile, sanitize_filename};
