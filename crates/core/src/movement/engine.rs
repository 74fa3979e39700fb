//! Runs the full pipeline over an entry session.

use chrono::NaiveDateTime;
use gestion_shared::config::EngineConfig;
use gestion_shared::types::{GateMode, ParseMode, ValidationMode};

use super::account::AccountCatalog;
use super::gate::{GateDecision, GateInput, PostingGate};
use super::line::{EntryLine, normalize};
use super::resolver::{Resolution, resolve};
use super::session::EntrySession;
use super::validation::{Violation, merge_violations, validate_lines};

/// Mode switches of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineSettings {
    /// Line entry style.
    pub validation_mode: ValidationMode,
    /// Balance enforcement.
    pub gate_mode: GateMode,
    /// Amount parsing leniency.
    pub parse_mode: ParseMode,
}

impl From<&EngineConfig> for EngineSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            validation_mode: config.validation_mode,
            gate_mode: config.gate_mode,
            parse_mode: config.parse_mode,
        }
    }
}

/// Everything the engine worked out for one session.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Normalized lines.
    pub lines: Vec<EntryLine>,
    /// Parse issues and rule violations, at most one per line.
    pub violations: Vec<Violation>,
    /// Posting lines and totals.
    pub resolution: Resolution,
    /// Parsed timestamp, if valid.
    pub occurred_at: Option<NaiveDateTime>,
    /// Gate verdict.
    pub decision: GateDecision,
}

impl Evaluation {
    /// Whether the gate admitted the movement.
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        self.decision.is_admitted()
    }
}

/// Normalizer, validator, resolver and gate wired together.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementEngine {
    settings: EngineSettings,
}

impl MovementEngine {
    /// Creates an engine.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// The engine's settings.
    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Evaluates a session against a catalog snapshot.
    ///
    /// Totals are computed for every line, valid or not, so they can be shown
    /// while the user is still typing.
    #[must_use]
    pub fn evaluate(&self, session: &EntrySession, catalog: &AccountCatalog) -> Evaluation {
        let normalized = normalize(session.lines(), self.settings.parse_mode);
        let violations = merge_violations(
            normalized.issues,
            validate_lines(&normalized.lines, self.settings.validation_mode, catalog),
        );
        let resolution = resolve(&normalized.lines, self.settings.validation_mode, catalog);
        let occurred_at = session.parsed_timestamp().ok();

        let decision = PostingGate::new(self.settings.gate_mode).evaluate(&GateInput {
            header: session.header(),
            timestamp_valid: occurred_at.is_some(),
            violations: &violations,
            totals: &resolution.totals,
            confirmed: session.confirmed(),
        });

        tracing::debug!(
            lines = normalized.lines.len(),
            violations = violations.len(),
            total_debit = %resolution.totals.total_debit,
            total_credit = %resolution.totals.total_credit,
            admitted = decision.is_admitted(),
            "Evaluated movement"
        );

        Evaluation {
            lines: normalized.lines,
            violations,
            resolution,
            occurred_at,
            decision,
        }
    }
}
