//! Turns entry lines into debit/credit posting lines and totals.

use gestion_shared::types::{AccountId, LineId, ValidationMode, round_currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::{AccountCatalog, AccountNature};
use super::line::EntryLine;

/// A line ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingLine {
    /// Id carried over from the entry line.
    pub line_id: LineId,
    /// Directory id, when the account resolved.
    pub account_id: Option<AccountId>,
    /// Account name, or the text the user entered if it did not resolve.
    pub account_label: String,
    /// Description.
    pub description: String,
    /// Debit side.
    pub debit: Decimal,
    /// Credit side.
    pub credit: Decimal,
    /// Notes.
    pub notes: String,
    /// Storage key of the attached file, filled in at submission.
    pub attachment: Option<String>,
}

/// Debit and credit sums of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementTotals {
    /// Sum of debits, rounded to currency precision.
    pub total_debit: Decimal,
    /// Sum of credits, rounded to currency precision.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub difference: Decimal,
}

impl MovementTotals {
    /// Sums the given lines.
    ///
    /// Sums saturate at the `Decimal` range instead of overflowing. Normalized
    /// lines never get there since each amount is capped at `MAX_AMOUNT`.
    #[must_use]
    pub fn from_lines(lines: &[PostingLine]) -> Self {
        let (debit, credit) = lines
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(d, c), line| {
                (d.saturating_add(line.debit), c.saturating_add(line.credit))
            });
        let total_debit = round_currency(debit);
        let total_credit = round_currency(credit);
        Self {
            total_debit,
            total_credit,
            difference: total_debit.saturating_sub(total_credit),
        }
    }

    /// Debits equal credits at currency precision.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.difference.is_zero()
    }
}

/// Output of [`resolve`].
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// One posting line per entry line, same order.
    pub lines: Vec<PostingLine>,
    /// Totals over `lines`.
    pub totals: MovementTotals,
}

/// Splits each line into debit and credit.
///
/// Explicit mode copies the entered sides. Derived mode puts the amount on the
/// account's nature side; accounts missing from the catalog post as debits.
#[must_use]
pub fn resolve(lines: &[EntryLine], mode: ValidationMode, catalog: &AccountCatalog) -> Resolution {
    let lines: Vec<PostingLine> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let account = catalog.resolve(&line.account);

            let (debit, credit) = match mode {
                ValidationMode::ExplicitDebitCredit => (line.debit, line.credit),
                ValidationMode::DerivedFromAccountNature => {
                    let nature = account.map_or_else(
                        || {
                            if line.account.is_selected() {
                                tracing::warn!(
                                    line = index + 1,
                                    account = %line.account,
                                    "Account not in directory, posting as debit"
                                );
                            }
                            AccountNature::Debit
                        },
                        |account| account.nature(),
                    );
                    match nature {
                        AccountNature::Debit => (line.amount, Decimal::ZERO),
                        AccountNature::Credit => (Decimal::ZERO, line.amount),
                    }
                }
            };

            PostingLine {
                line_id: line.id,
                account_id: account.map(|a| a.id),
                account_label: account.map_or_else(|| line.account.to_string(), |a| a.name.clone()),
                description: line.description.clone(),
                debit,
                credit,
                notes: line.notes.clone(),
                attachment: None,
            }
        })
        .collect();

    let totals = MovementTotals::from_lines(&lines);
    Resolution { lines, totals }
}
