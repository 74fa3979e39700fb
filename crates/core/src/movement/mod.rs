//! Movement validation and posting.
//!
//! A movement is a header (timestamp, client, company, bank) plus lines. Lines
//! flow through a fixed pipeline before anything is stored:
//!
//! ```text
//! RawLine ──normalize──▶ EntryLine ──validate──▶ Violation*
//!                             │
//!                             └──resolve──▶ PostingLine + MovementTotals ──gate──▶ GateDecision
//! ```
//!
//! Two switches shape the pipeline: `ValidationMode` (explicit debit/credit or
//! a single amount sided by the account's nature) and `GateMode` (strict
//! balance or a warning plus explicit confirmation).

pub mod account;
pub mod engine;
pub mod error;
pub mod gate;
pub mod line;
pub mod resolver;
pub mod service;
pub mod session;
pub mod types;
pub mod validation;

#[cfg(test)]
mod engine_props;

pub use account::{
    Account, AccountCatalog, AccountDirectory, AccountNature, CachedDirectory, DirectoryError,
};
pub use engine::{EngineSettings, Evaluation, MovementEngine};
pub use error::{MovementError, RepositoryError};
pub use gate::{
    CatalogRef, DenyReason, GateDecision, GateInput, GateWarning, HeaderField, HeaderSelection,
    PostingGate,
};
pub use line::{AccountRef, EntryLine, LineField, Normalized, RawLine, UNSELECTED_LABEL, normalize};
pub use resolver::{MovementTotals, PostingLine, Resolution, resolve};
pub use service::{MovementRepository, MovementService, SubmitOutcome, SubmitReceipt};
pub use session::{EntrySession, SessionError, TIMESTAMP_FORMAT};
pub use types::{MovementHeader, MovementLineRecord, MovementStatus, MovementSummary, NewMovement};
pub use validation::{LineRule, Violation, merge_violations, validate_lines};
