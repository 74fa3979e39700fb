//! Property-based tests for the movement pipeline.

use gestion_shared::types::{AccountId, BankId, ClientId, CompanyId, GateMode, ParseMode, ValidationMode};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::account::{Account, AccountCatalog};
use super::gate::{CatalogRef, GateInput, HeaderSelection, PostingGate};
use super::line::{AccountRef, EntryLine, RawLine, normalize};
use super::resolver::{MovementTotals, resolve};
use super::validation::{LineRule, Violation, validate_lines};

/// Amount text as a user might type it: valid, negative, blank, garbage.
fn amount_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => (0i64..10_000_000i64).prop_map(|cents| Some(Decimal::new(cents, 2).to_string())),
        1 => (1i64..10_000i64).prop_map(|cents| Some(Decimal::new(-cents, 2).to_string())),
        1 => Just(None),
        1 => Just(Some(String::new())),
        1 => "[a-z ]{1,6}".prop_map(Some),
    ]
}

fn account_ref(catalog: &[Account]) -> impl Strategy<Value = AccountRef> + use<> {
    let ids: Vec<AccountId> = catalog.iter().map(|a| a.id).collect();
    prop_oneof![
        1 => Just(AccountRef::Unselected),
        4 => proptest::sample::select(ids).prop_map(AccountRef::Id),
        1 => "[A-Z][a-z]{2,8}".prop_map(AccountRef::Label),
    ]
}

fn accounts() -> Vec<Account> {
    vec![
        Account::new(AccountId::new(), "Caja", "INGRESO"),
        Account::new(AccountId::new(), "Bancos", "ACTIVO"),
        Account::new(AccountId::new(), "Papeleria", "GASTO"),
        Account::new(AccountId::new(), "Nomina", "EGRESO"),
    ]
}

fn raw_line(catalog: &[Account]) -> impl Strategy<Value = RawLine> + use<> {
    (
        account_ref(catalog),
        amount_text(),
        amount_text(),
        amount_text(),
        proptest::option::of("[ a-z]{0,12}"),
    )
        .prop_map(|(account, amount, debit, credit, description)| RawLine {
            account,
            amount,
            debit,
            credit,
            description,
            ..RawLine::blank()
        })
}

fn raw_lines() -> impl Strategy<Value = (Vec<Account>, Vec<RawLine>)> {
    let catalog = accounts();
    let lines = proptest::collection::vec(raw_line(&catalog), 1..8);
    (Just(catalog), lines)
}

fn validation_mode() -> impl Strategy<Value = ValidationMode> {
    prop_oneof![
        Just(ValidationMode::ExplicitDebitCredit),
        Just(ValidationMode::DerivedFromAccountNature),
    ]
}

fn parse_mode() -> impl Strategy<Value = ParseMode> {
    prop_oneof![Just(ParseMode::Lenient), Just(ParseMode::Strict)]
}

fn header(client: bool, company: bool, bank: bool) -> HeaderSelection {
    HeaderSelection {
        client: client.then(|| CatalogRef::new(ClientId::new(), "ACME")),
        company: company.then(|| CatalogRef::new(CompanyId::new(), "Gestion SA")),
        bank: bank.then(|| CatalogRef::new(BankId::new(), "Banco Uno")),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Normalizing already-normalized lines changes nothing.
    ///
    /// Negative entries are rendered back as entered, so only they can be
    /// reported again.
    #[test]
    fn prop_normalize_is_idempotent((_, raw) in raw_lines(), mode in parse_mode()) {
        let once = normalize(&raw, mode);
        let rendered: Vec<RawLine> = once.lines.iter().map(EntryLine::to_raw).collect();
        let twice = normalize(&rendered, mode);

        prop_assert_eq!(&once.lines, &twice.lines);
        prop_assert!(twice.issues.iter().all(|issue| issue.rule == LineRule::NegativeAmount));
    }

    /// Normalized amounts are never negative and ids are preserved in order.
    #[test]
    fn prop_normalized_amounts_non_negative((_, raw) in raw_lines(), mode in parse_mode()) {
        let normalized = normalize(&raw, mode);

        prop_assert_eq!(normalized.lines.len(), raw.len());
        for (line, source) in normalized.lines.iter().zip(&raw) {
            prop_assert_eq!(line.id, source.id);
            prop_assert!(line.amount >= Decimal::ZERO);
            prop_assert!(line.debit >= Decimal::ZERO);
            prop_assert!(line.credit >= Decimal::ZERO);
        }
        if mode == ParseMode::Lenient {
            prop_assert!(normalized.issues.is_empty());
        }
    }

    /// Violation-free explicit lines post on exactly one side.
    #[test]
    fn prop_explicit_valid_lines_single_sided((accounts, raw) in raw_lines()) {
        let catalog = AccountCatalog::new(accounts);
        let normalized = normalize(&raw, ParseMode::Lenient);
        let violations = validate_lines(&normalized.lines, ValidationMode::ExplicitDebitCredit, &catalog);
        let resolution = resolve(&normalized.lines, ValidationMode::ExplicitDebitCredit, &catalog);

        for (index, line) in resolution.lines.iter().enumerate() {
            let violated = violations.iter().any(|v| v.line == index + 1);
            if !violated {
                prop_assert!(line.debit.is_zero() != line.credit.is_zero());
            }
        }
    }

    /// Derived lines post the whole amount on exactly the nature side.
    #[test]
    fn prop_derived_amount_lands_on_one_side((accounts, raw) in raw_lines()) {
        let catalog = AccountCatalog::new(accounts);
        let normalized = normalize(&raw, ParseMode::Lenient);
        let resolution = resolve(&normalized.lines, ValidationMode::DerivedFromAccountNature, &catalog);

        for (line, entry) in resolution.lines.iter().zip(&normalized.lines) {
            prop_assert_eq!(line.debit + line.credit, entry.amount);
            prop_assert!(line.debit.is_zero() || line.credit.is_zero());
            prop_assert_eq!(line.line_id, entry.id);
        }
    }

    /// Totals are the rounded sums of the posting lines.
    #[test]
    fn prop_totals_match_lines((accounts, raw) in raw_lines(), mode in validation_mode()) {
        let catalog = AccountCatalog::new(accounts);
        let normalized = normalize(&raw, ParseMode::Lenient);
        let resolution = resolve(&normalized.lines, mode, &catalog);

        let expected = MovementTotals::from_lines(&resolution.lines);
        prop_assert_eq!(resolution.totals, expected);
        prop_assert_eq!(
            resolution.totals.difference,
            resolution.totals.total_debit - resolution.totals.total_credit
        );
    }

    /// Strict gating admits exactly the complete, clean, balanced movements.
    #[test]
    fn prop_strict_gate_admission(
        client in any::<bool>(),
        company in any::<bool>(),
        bank in any::<bool>(),
        violated in any::<bool>(),
        debit in 0i64..1_000_000i64,
        credit in 0i64..1_000_000i64,
        confirmed in any::<bool>(),
    ) {
        let header = header(client, company, bank);
        let violations: Vec<Violation> = if violated {
            vec![Violation::new(1, gestion_shared::types::LineId::new(), LineRule::MissingAccount)]
        } else {
            Vec::new()
        };
        let totals = MovementTotals {
            total_debit: Decimal::new(debit, 2),
            total_credit: Decimal::new(credit, 2),
            difference: Decimal::new(debit - credit, 2),
        };
        let input = GateInput {
            header: &header,
            timestamp_valid: true,
            violations: &violations,
            totals: &totals,
            confirmed,
        };

        let decision = PostingGate::new(GateMode::Strict).evaluate(&input);
        let expected = client && company && bank && !violated && debit == credit;
        prop_assert_eq!(decision.is_admitted(), expected);
        prop_assert!(decision.warnings().is_empty());
    }

    /// Relaxed gating ignores balance for admission but always requires confirmation.
    #[test]
    fn prop_relaxed_gate_admission(
        complete in any::<bool>(),
        violated in any::<bool>(),
        debit in 0i64..1_000_000i64,
        credit in 0i64..1_000_000i64,
        confirmed in any::<bool>(),
    ) {
        let header = header(complete, true, true);
        let violations: Vec<Violation> = if violated {
            vec![Violation::new(2, gestion_shared::types::LineId::new(), LineRule::NeitherSide)]
        } else {
            Vec::new()
        };
        let totals = MovementTotals {
            total_debit: Decimal::new(debit, 2),
            total_credit: Decimal::new(credit, 2),
            difference: Decimal::new(debit - credit, 2),
        };
        let input = GateInput {
            header: &header,
            timestamp_valid: true,
            violations: &violations,
            totals: &totals,
            confirmed,
        };

        let decision = PostingGate::new(GateMode::Relaxed).evaluate(&input);
        prop_assert_eq!(decision.is_admitted(), complete && !violated && confirmed);
        prop_assert_eq!(decision.warnings().is_empty(), debit == credit);
    }
}
