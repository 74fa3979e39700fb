//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod catalog;
pub mod movement;
pub mod user;

pub use catalog::CatalogRepository;
pub use movement::MovementRepository;
pub use user::{RoleRecord, UserAccount, UserError, UserRepository};
