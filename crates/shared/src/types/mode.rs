//! Engine mode switches.
//!
//! These live here so configuration can deserialize them without depending on
//! the core engine crate.

use serde::{Deserialize, Serialize};

/// How movement lines express their posting side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Each line carries separate debit and credit amounts.
    ExplicitDebitCredit,
    /// Each line carries one amount; the side comes from the account's nature.
    #[default]
    DerivedFromAccountNature,
}

/// Whether an unbalanced movement blocks posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Debits must equal credits before posting.
    #[default]
    Strict,
    /// Imbalance is a warning; an explicit confirmation is required instead.
    Relaxed,
}

/// How unparseable or negative amount text is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Bad input is silently coerced to zero.
    #[default]
    Lenient,
    /// Bad input is coerced to zero and reported as a line violation.
    Strict,
}
