//! Records exchanged with the movement repository.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use gestion_shared::types::{AccountId, BankId, ClientId, CompanyId, LineId, MovementId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::gate::CatalogRef;
use super::resolver::PostingLine;

/// An admitted movement, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    /// When the movement happened.
    pub occurred_at: NaiveDateTime,
    /// Client.
    pub client: CatalogRef<ClientId>,
    /// Company.
    pub company: CatalogRef<CompanyId>,
    /// Bank.
    pub bank: CatalogRef<BankId>,
    /// Rounded debit total.
    pub total_debit: Decimal,
    /// Rounded credit total.
    pub total_credit: Decimal,
    /// Lines in entry order.
    pub lines: Vec<PostingLine>,
}

/// Lifecycle status of a stored movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementStatus {
    /// Stored successfully.
    #[default]
    #[serde(rename = "OK")]
    Recorded,
}

impl MovementStatus {
    /// Status text.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recorded => "OK",
        }
    }
}

impl fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the movement listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSummary {
    /// Movement id.
    pub id: MovementId,
    /// Calendar date of the movement.
    pub date: NaiveDate,
    /// Client name.
    pub client: String,
    /// Company name.
    pub company: String,
    /// Bank name.
    pub bank: String,
    /// Debit total.
    pub total_debit: Decimal,
    /// Credit total.
    pub total_credit: Decimal,
    /// Status.
    pub status: MovementStatus,
}

/// A stored movement header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementHeader {
    /// Movement id.
    pub id: MovementId,
    /// When the movement happened.
    pub occurred_at: NaiveDateTime,
    /// Client.
    pub client: CatalogRef<ClientId>,
    /// Company.
    pub company: CatalogRef<CompanyId>,
    /// Bank.
    pub bank: CatalogRef<BankId>,
    /// Debit total.
    pub total_debit: Decimal,
    /// Credit total.
    pub total_credit: Decimal,
    /// Status.
    pub status: MovementStatus,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// A stored movement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementLineRecord {
    /// Line id.
    pub id: LineId,
    /// 1-based position within the movement.
    pub position: i32,
    /// Account id, if it resolved at entry time.
    pub account_id: Option<AccountId>,
    /// Account label.
    pub account_label: String,
    /// Description.
    pub description: String,
    /// Debit.
    pub debit: Decimal,
    /// Credit.
    pub credit: Decimal,
    /// Notes.
    pub notes: String,
    /// Attachment storage key.
    pub attachment: Option<String>,
}
