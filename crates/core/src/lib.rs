//! Core business logic for Gestion.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through traits the db crate implements.
//!
//! # Modules
//!
//! - `movement` - Line normalization, validation, debit/credit resolution and the posting gate
//! - `storage` - Line attachment storage over OpenDAL
//! - `export` - CSV export of movement listings and details
//! - `auth` - Roles, page access and password hashing

pub mod auth;
pub mod export;
pub mod movement;
pub mod storage;
