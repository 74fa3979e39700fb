//! Shared types, errors, and configuration for Gestion.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Decimal amount helpers (parsing, currency rounding, display)
//! - Engine mode switches shared by configuration and the core engine
//! - Application-wide error types
//! - Configuration management
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
