//! The posting gate: decides whether a movement may be stored.

use std::fmt;

use gestion_shared::types::{BankId, ClientId, CompanyId, GateMode, format_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::resolver::MovementTotals;
use super::validation::Violation;

/// A selected catalog entry (client, company or bank).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRef<I> {
    /// Entry id.
    pub id: I,
    /// Entry name at the time of selection.
    pub name: String,
}

impl<I: fmt::Display> CatalogRef<I> {
    /// Creates a reference.
    pub fn new(id: I, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Selector label: `"<name> (ID <id>)"`.
    pub fn label(&self) -> String {
        format!("{} (ID {})", self.name, self.id)
    }
}

/// Header fields that must be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderField {
    /// Client.
    Client,
    /// Company.
    Company,
    /// Bank.
    Bank,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Client => "client",
            Self::Company => "company",
            Self::Bank => "bank",
        })
    }
}

/// Client, company and bank chosen for a movement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderSelection {
    /// Selected client.
    pub client: Option<CatalogRef<ClientId>>,
    /// Selected company.
    pub company: Option<CatalogRef<CompanyId>>,
    /// Selected bank.
    pub bank: Option<CatalogRef<BankId>>,
}

impl HeaderSelection {
    /// Fields still unselected, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<HeaderField> {
        let mut missing = Vec::new();
        if self.client.is_none() {
            missing.push(HeaderField::Client);
        }
        if self.company.is_none() {
            missing.push(HeaderField::Company);
        }
        if self.bank.is_none() {
            missing.push(HeaderField::Bank);
        }
        missing
    }

    /// All three fields are selected.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.client.is_some() && self.company.is_some() && self.bank.is_some()
    }
}

/// Why the gate refused a movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// Header selections missing.
    HeaderIncomplete(Vec<HeaderField>),
    /// Timestamp text is not `dd/mm/YYYY HH:MM:SS`.
    InvalidTimestamp,
    /// One or more lines failed validation.
    LineViolations(Vec<Violation>),
    /// Debits differ from credits under strict gating.
    Unbalanced {
        /// `total_debit - total_credit`.
        difference: Decimal,
    },
    /// Relaxed gating needs the user's confirmation.
    ConfirmationRequired,
}

impl DenyReason {
    /// Machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::HeaderIncomplete(_) => "HEADER_INCOMPLETE",
            Self::InvalidTimestamp => "INVALID_TIMESTAMP",
            Self::LineViolations(_) => "LINE_VIOLATIONS",
            Self::Unbalanced { .. } => "UNBALANCED",
            Self::ConfirmationRequired => "CONFIRMATION_REQUIRED",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderIncomplete(fields) => {
                let names: Vec<String> = fields.iter().map(ToString::to_string).collect();
                write!(f, "select {}", names.join(", "))
            }
            Self::InvalidTimestamp => f.write_str("timestamp must be dd/mm/YYYY HH:MM:SS"),
            Self::LineViolations(violations) => {
                let lines: Vec<String> = violations.iter().map(ToString::to_string).collect();
                f.write_str(&lines.join("; "))
            }
            Self::Unbalanced { difference } => write!(
                f,
                "total debit must equal total credit (difference {})",
                format_amount(*difference)
            ),
            Self::ConfirmationRequired => f.write_str("confirmation required"),
        }
    }
}

/// Non-blocking observation attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateWarning {
    /// Debits differ from credits under relaxed gating.
    Unbalanced {
        /// `total_debit - total_credit`.
        difference: Decimal,
    },
}

impl fmt::Display for GateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbalanced { difference } => write!(
                f,
                "movement is not balanced (difference {})",
                format_amount(*difference)
            ),
        }
    }
}

/// The gate's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The movement may be stored.
    Admit {
        /// Warnings to show alongside the success.
        warnings: Vec<GateWarning>,
    },
    /// The movement must not be stored.
    Deny {
        /// Every reason that applies, in check order.
        reasons: Vec<DenyReason>,
        /// Warnings that apply regardless.
        warnings: Vec<GateWarning>,
    },
}

impl GateDecision {
    /// Returns true for `Admit`.
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit { .. })
    }

    /// Deny reasons; empty when admitted.
    #[must_use]
    pub fn reasons(&self) -> &[DenyReason] {
        match self {
            Self::Admit { .. } => &[],
            Self::Deny { reasons, .. } => reasons,
        }
    }

    /// Warnings of either outcome.
    #[must_use]
    pub fn warnings(&self) -> &[GateWarning] {
        match self {
            Self::Admit { warnings } | Self::Deny { warnings, .. } => warnings,
        }
    }
}

/// Everything the gate looks at.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    /// Header selections.
    pub header: &'a HeaderSelection,
    /// Whether the timestamp text parsed.
    pub timestamp_valid: bool,
    /// Line violations after merging parse issues.
    pub violations: &'a [Violation],
    /// Movement totals.
    pub totals: &'a MovementTotals,
    /// The user's confirmation toggle.
    pub confirmed: bool,
}

/// Posting gate for one gating mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostingGate {
    mode: GateMode,
}

impl PostingGate {
    /// Creates a gate.
    #[must_use]
    pub fn new(mode: GateMode) -> Self {
        Self { mode }
    }

    /// The gating mode.
    #[must_use]
    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Evaluates the input.
    ///
    /// Strict admits only a movement with a complete header, a valid
    /// timestamp, no line violations and balanced totals. Relaxed turns
    /// imbalance into a warning but requires confirmation.
    #[must_use]
    pub fn evaluate(&self, input: &GateInput<'_>) -> GateDecision {
        let mut reasons = Vec::new();
        let mut warnings = Vec::new();

        let missing = input.header.missing_fields();
        if !missing.is_empty() {
            reasons.push(DenyReason::HeaderIncomplete(missing));
        }
        if !input.timestamp_valid {
            reasons.push(DenyReason::InvalidTimestamp);
        }
        if !input.violations.is_empty() {
            reasons.push(DenyReason::LineViolations(input.violations.to_vec()));
        }

        if !input.totals.is_balanced() {
            let difference = input.totals.difference;
            match self.mode {
                GateMode::Strict => reasons.push(DenyReason::Unbalanced { difference }),
                GateMode::Relaxed => warnings.push(GateWarning::Unbalanced { difference }),
            }
        }

        if self.mode == GateMode::Relaxed && !input.confirmed {
            reasons.push(DenyReason::ConfirmationRequired);
        }

        if reasons.is_empty() {
            GateDecision::Admit { warnings }
        } else {
            GateDecision::Deny { reasons, warnings }
        }
    }
}
