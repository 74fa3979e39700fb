//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{GateMode, ParseMode, ValidationMode};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Attachment storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Movement engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Where line attachments are written.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Root directory for uploaded files.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed MIME types. Empty accepts any type.
    #[serde(default)]
    pub allowed_mime_types: Vec<String>,
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("data/uploads")
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            max_file_size: default_max_file_size(),
            allowed_mime_types: Vec::new(),
        }
    }
}

/// Movement engine switches.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Line entry style.
    #[serde(default)]
    pub validation_mode: ValidationMode,
    /// Balance enforcement.
    #[serde(default)]
    pub gate_mode: GateMode,
    /// Amount parsing leniency.
    #[serde(default)]
    pub parse_mode: ParseMode,
    /// How long a loaded account catalog may be reused, in seconds.
    #[serde(default = "default_catalog_ttl")]
    pub catalog_ttl_secs: u64,
}

fn default_catalog_ttl() -> u64 {
    60
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::default(),
            gate_mode: GateMode::default(),
            parse_mode: ParseMode::default(),
            catalog_ttl_secs: default_catalog_ttl(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "gestion=info,sea_orm=warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("GESTION")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("GESTION__DATABASE__URL", Some("postgres://localhost/gestion")),
                ("GESTION__ENGINE__GATE_MODE", Some("relaxed")),
                ("GESTION__ENGINE__VALIDATION_MODE", Some("explicit_debit_credit")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/gestion");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.engine.gate_mode, GateMode::Relaxed);
                assert_eq!(
                    config.engine.validation_mode,
                    ValidationMode::ExplicitDebitCredit
                );
                assert_eq!(config.engine.parse_mode, ParseMode::Lenient);
                assert_eq!(config.engine.catalog_ttl_secs, 60);
                assert_eq!(config.storage.uploads_dir, PathBuf::from("data/uploads"));
                assert!(!config.logging.json);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars([("GESTION__DATABASE__URL", None::<&str>)], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_section_defaults() {
        let storage = StorageSettings::default();
        assert_eq!(storage.max_file_size, 10 * 1024 * 1024);
        assert!(storage.allowed_mime_types.is_empty());

        let engine = EngineConfig::default();
        assert_eq!(engine.gate_mode, GateMode::Strict);
        assert_eq!(engine.catalog_ttl_secs, 60);

        assert_eq!(LoggingConfig::default().filter, "gestion=info,sea_orm=warn");
    }
}
