//! Per-line validation rules.
//!
//! Explicit mode: an account, no negatives, exactly one of debit or credit.
//! Derived mode: an account known to the directory and an amount above zero.

use std::fmt;

use gestion_shared::types::{LineId, ValidationMode};
use rust_decimal::Decimal;
use thiserror::Error;

use super::account::AccountCatalog;
use super::line::{EntryLine, LineField};

/// A rule a line can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    /// No account selected.
    MissingAccount,
    /// Account not present in the directory.
    InvalidAccount,
    /// Debit and credit both above zero.
    BothSides,
    /// Debit and credit both zero.
    NeitherSide,
    /// An amount was negative.
    NegativeAmount,
    /// Amount was zero.
    NonPositiveAmount,
    /// An amount field could not be parsed.
    InvalidNumber(LineField),
}

impl LineRule {
    /// Machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingAccount => "MISSING_ACCOUNT",
            Self::InvalidAccount => "INVALID_ACCOUNT",
            Self::BothSides => "BOTH_SIDES",
            Self::NeitherSide => "NEITHER_SIDE",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::InvalidNumber(_) => "INVALID_NUMBER",
        }
    }
}

impl fmt::Display for LineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAccount => f.write_str("missing account"),
            Self::InvalidAccount => f.write_str("invalid account"),
            Self::BothSides => f.write_str("cannot have both debit and credit"),
            Self::NeitherSide => f.write_str("must have debit or credit"),
            Self::NegativeAmount => f.write_str("no negatives allowed"),
            Self::NonPositiveAmount => f.write_str("amount must be greater than zero"),
            Self::InvalidNumber(field) => write!(f, "{field} is not a valid number"),
        }
    }
}

/// A broken rule, pinned to a line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line}: {rule}")]
pub struct Violation {
    /// 1-based position at the time of validation.
    pub line: usize,
    /// Stable id of the offending line.
    pub line_id: LineId,
    /// The rule that failed.
    pub rule: LineRule,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(line: usize, line_id: LineId, rule: LineRule) -> Self {
        Self {
            line,
            line_id,
            rule,
        }
    }
}

fn check_explicit(line: &EntryLine) -> Option<LineRule> {
    if !line.account.is_selected() {
        return Some(LineRule::MissingAccount);
    }
    // The normalizer zeroes negative entries; the flag keeps them visible here.
    if line.has_negative_side() || line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
        return Some(LineRule::NegativeAmount);
    }
    match (line.debit.is_zero(), line.credit.is_zero()) {
        (false, false) => Some(LineRule::BothSides),
        (true, true) => Some(LineRule::NeitherSide),
        _ => None,
    }
}

fn check_derived(line: &EntryLine, catalog: &AccountCatalog) -> Option<LineRule> {
    if !line.account.is_selected() {
        return Some(LineRule::MissingAccount);
    }
    if catalog.resolve(&line.account).is_none() {
        return Some(LineRule::InvalidAccount);
    }
    if line.amount <= Decimal::ZERO {
        return Some(LineRule::NonPositiveAmount);
    }
    None
}

/// Checks every line, returning at most one violation per line in line order.
#[must_use]
pub fn validate_lines(
    lines: &[EntryLine],
    mode: ValidationMode,
    catalog: &AccountCatalog,
) -> Vec<Violation> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let rule = match mode {
                ValidationMode::ExplicitDebitCredit => check_explicit(line),
                ValidationMode::DerivedFromAccountNature => check_derived(line, catalog),
            }?;
            Some(Violation::new(index + 1, line.id, rule))
        })
        .collect()
}

/// Combines parse issues with rule violations, keeping the first entry per line.
#[must_use]
pub fn merge_violations(issues: Vec<Violation>, violations: Vec<Violation>) -> Vec<Violation> {
    let mut merged: Vec<Violation> = Vec::with_capacity(issues.len() + violations.len());
    for violation in issues.into_iter().chain(violations) {
        if !merged.iter().any(|seen| seen.line_id == violation.line_id) {
            merged.push(violation);
        }
    }
    merged.sort_by_key(|v| v.line);
    merged
}
