//! Movement lines as typed by the user, and their normalized form.

use std::fmt;
use std::str::FromStr;

use gestion_shared::types::{AccountId, LineId, MAX_AMOUNT, ParseMode, parse_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{LineRule, Violation};

/// Placeholder shown in account selectors when nothing is chosen.
pub const UNSELECTED_LABEL: &str = "Seleccione";

/// The account a line points at, as picked in the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRef {
    /// No account chosen.
    #[default]
    Unselected,
    /// An account chosen by id.
    Id(AccountId),
    /// An account typed or picked by label.
    Label(String),
}

impl AccountRef {
    /// Interprets free text from an account selector.
    ///
    /// Blank text and the placeholder mean unselected; an id string becomes `Id`.
    #[must_use]
    pub fn from_input(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case(UNSELECTED_LABEL) {
            return Self::Unselected;
        }
        match AccountId::from_str(text) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Label(text.to_string()),
        }
    }

    /// Returns true unless the reference is `Unselected`.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        !matches!(self, Self::Unselected)
    }

    fn canonical(&self) -> Self {
        match self {
            Self::Label(text) => Self::from_input(text),
            other => other.clone(),
        }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unselected => Ok(()),
            Self::Id(id) => write!(f, "{id}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Which numeric field of a line a problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineField {
    /// Single amount (derived mode).
    Amount,
    /// Debit amount (explicit mode).
    Debit,
    /// Credit amount (explicit mode).
    Credit,
}

impl fmt::Display for LineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Amount => "amount",
            Self::Debit => "debit",
            Self::Credit => "credit",
        })
    }
}

/// A line exactly as entered. Every field may be missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawLine {
    /// Stable identity; survives edits and reordering.
    pub id: LineId,
    /// Selected account.
    pub account: AccountRef,
    /// Free-text description.
    pub description: Option<String>,
    /// Amount text (derived mode).
    pub amount: Option<String>,
    /// Debit text (explicit mode).
    pub debit: Option<String>,
    /// Credit text (explicit mode).
    pub credit: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl RawLine {
    /// A new empty line with a fresh id.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: LineId::new(),
            ..Self::default()
        }
    }

    /// Copies every field except the id.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: LineId::new(),
            ..self.clone()
        }
    }
}

/// A line with every field coerced to its canonical type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLine {
    /// Same id as the raw line it came from.
    pub id: LineId,
    /// Canonical account reference.
    pub account: AccountRef,
    /// Trimmed description, empty when missing.
    pub description: String,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Non-negative debit.
    pub debit: Decimal,
    /// Non-negative credit.
    pub credit: Decimal,
    /// Trimmed notes, empty when missing.
    pub notes: String,
    /// First field entered as a negative number, with the entered value.
    /// That field itself holds zero.
    pub negative: Option<(LineField, Decimal)>,
}

impl EntryLine {
    /// Renders the line back into entry form.
    ///
    /// A field entered as a negative number is rendered with its entered value,
    /// so normalizing the result yields this line again.
    #[must_use]
    pub fn to_raw(&self) -> RawLine {
        let render = |field: LineField, value: Decimal| match self.negative {
            Some((negative_field, entered)) if negative_field == field => entered.to_string(),
            _ => value.to_string(),
        };
        RawLine {
            id: self.id,
            account: self.account.clone(),
            description: Some(self.description.clone()),
            amount: Some(render(LineField::Amount, self.amount)),
            debit: Some(render(LineField::Debit, self.debit)),
            credit: Some(render(LineField::Credit, self.credit)),
            notes: Some(self.notes.clone()),
        }
    }

    /// Returns true if the debit or credit field was entered as a negative number.
    #[must_use]
    pub fn has_negative_side(&self) -> bool {
        matches!(self.negative, Some((LineField::Debit | LineField::Credit, _)))
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// One entry per input line, same order.
    pub lines: Vec<EntryLine>,
    /// Parse problems. Always empty in lenient mode.
    pub issues: Vec<Violation>,
}

enum AmountInput {
    Missing,
    Valid(Decimal),
    Invalid,
    Negative(Decimal),
}

fn read_amount(text: Option<&str>) -> AmountInput {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return AmountInput::Missing;
    };
    match parse_amount(text) {
        None => AmountInput::Invalid,
        Some(value) if value.is_zero() => AmountInput::Valid(Decimal::ZERO),
        Some(value) if value.is_sign_negative() => AmountInput::Negative(value),
        Some(value) if value > MAX_AMOUNT => AmountInput::Invalid,
        Some(value) => AmountInput::Valid(value),
    }
}

fn clean_text(text: Option<&String>) -> String {
    text.map(|t| t.trim().to_string()).unwrap_or_default()
}

/// Coerces raw lines into entry lines.
///
/// Missing or malformed amounts become zero, as do amounts above `MAX_AMOUNT`
/// and negatives. A negative entry is remembered on the line so the validator
/// can still reject it. In strict parse mode each coercion also yields an
/// issue; the first issue per line wins.
#[must_use]
pub fn normalize(raw: &[RawLine], mode: ParseMode) -> Normalized {
    let mut issues = Vec::new();
    let mut lines = Vec::with_capacity(raw.len());

    for (index, line) in raw.iter().enumerate() {
        let mut issue: Option<LineRule> = None;
        let mut negative: Option<(LineField, Decimal)> = None;
        let mut coerce = |field: LineField, text: Option<&String>| -> Decimal {
            match read_amount(text.map(String::as_str)) {
                AmountInput::Missing => Decimal::ZERO,
                AmountInput::Valid(value) => value,
                AmountInput::Invalid => {
                    issue.get_or_insert(LineRule::InvalidNumber(field));
                    Decimal::ZERO
                }
                AmountInput::Negative(entered) => {
                    issue.get_or_insert(LineRule::NegativeAmount);
                    negative.get_or_insert((field, entered));
                    Decimal::ZERO
                }
            }
        };

        let amount = coerce(LineField::Amount, line.amount.as_ref());
        let debit = coerce(LineField::Debit, line.debit.as_ref());
        let credit = coerce(LineField::Credit, line.credit.as_ref());

        if mode == ParseMode::Strict {
            if let Some(rule) = issue {
                issues.push(Violation::new(index + 1, line.id, rule));
            }
        }

        lines.push(EntryLine {
            id: line.id,
            account: line.account.canonical(),
            description: clean_text(line.description.as_ref()),
            amount,
            debit,
            credit,
            notes: clean_text(line.notes.as_ref()),
            negative,
        });
    }

    Normalized { lines, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn line(amount: Option<&str>, debit: Option<&str>, credit: Option<&str>) -> RawLine {
        RawLine {
            amount: amount.map(str::to_string),
            debit: debit.map(str::to_string),
            credit: credit.map(str::to_string),
            ..RawLine::blank()
        }
    }

    #[rstest]
    #[case("", AccountRef::Unselected)]
    #[case("  ", AccountRef::Unselected)]
    #[case("Seleccione", AccountRef::Unselected)]
    #[case(" Caja ", AccountRef::Label("Caja".to_string()))]
    fn test_account_ref_from_input(#[case] input: &str, #[case] expected: AccountRef) {
        assert_eq!(AccountRef::from_input(input), expected);
    }

    #[test]
    fn test_account_ref_from_id_text() {
        let id = AccountId::new();
        assert_eq!(AccountRef::from_input(&id.to_string()), AccountRef::Id(id));
    }

    #[test]
    fn test_normalize_coerces_lenient() {
        let raw = vec![
            line(Some("100"), None, None),
            line(Some("abc"), Some("-5"), Some(" 20.5 ")),
            line(None, None, None),
        ];

        let normalized = normalize(&raw, ParseMode::Lenient);

        assert!(normalized.issues.is_empty());
        assert_eq!(normalized.lines.len(), 3);
        assert_eq!(normalized.lines[0].amount, dec!(100));
        assert_eq!(normalized.lines[1].amount, Decimal::ZERO);
        assert_eq!(normalized.lines[1].debit, Decimal::ZERO);
        assert_eq!(normalized.lines[1].credit, dec!(20.5));
        assert_eq!(normalized.lines[1].negative, Some((LineField::Debit, dec!(-5))));
        assert!(normalized.lines[1].has_negative_side());
        assert!(!normalized.lines[0].has_negative_side());
        assert_eq!(normalized.lines[2].amount, Decimal::ZERO);
        assert_eq!(normalized.lines[2].description, "");
        assert_eq!(normalized.lines[0].id, raw[0].id);
    }

    #[test]
    fn test_normalize_strict_reports_issues() {
        let raw = vec![
            line(Some("10"), None, None),
            line(Some("diez"), None, None),
            line(None, Some("-3"), None),
        ];

        let normalized = normalize(&raw, ParseMode::Strict);

        assert_eq!(normalized.lines[1].amount, Decimal::ZERO);
        assert_eq!(normalized.issues.len(), 2);
        assert_eq!(normalized.issues[0].line, 2);
        assert_eq!(
            normalized.issues[0].rule,
            LineRule::InvalidNumber(LineField::Amount)
        );
        assert_eq!(normalized.issues[1].line, 3);
        assert_eq!(normalized.issues[1].rule, LineRule::NegativeAmount);
    }

    #[test]
    fn test_normalize_trims_text_and_canonicalizes_account() {
        let raw = vec![RawLine {
            account: AccountRef::Label(" Seleccione ".to_string()),
            description: Some("  pago proveedor ".to_string()),
            notes: Some(" ".to_string()),
            ..RawLine::blank()
        }];

        let normalized = normalize(&raw, ParseMode::Lenient);

        assert_eq!(normalized.lines[0].account, AccountRef::Unselected);
        assert_eq!(normalized.lines[0].description, "pago proveedor");
        assert_eq!(normalized.lines[0].notes, "");
    }

    #[test]
    fn test_amount_above_limit_is_invalid() {
        let raw = vec![
            line(Some("79228162514264337593543950335"), None, None),
            line(None, Some("9999999999999999.99"), None),
        ];

        let lenient = normalize(&raw, ParseMode::Lenient);
        assert_eq!(lenient.lines[0].amount, Decimal::ZERO);
        assert_eq!(lenient.lines[1].debit, MAX_AMOUNT);
        assert!(lenient.issues.is_empty());

        let strict = normalize(&raw, ParseMode::Strict);
        assert_eq!(strict.issues.len(), 1);
        assert_eq!(
            strict.issues[0].rule,
            LineRule::InvalidNumber(LineField::Amount)
        );
    }

    #[test]
    fn test_negative_entry_survives_renormalizing() {
        let raw = vec![line(None, Some("-5"), Some("10"))];

        let once = normalize(&raw, ParseMode::Lenient);
        let rendered: Vec<RawLine> = once.lines.iter().map(EntryLine::to_raw).collect();
        assert_eq!(rendered[0].debit.as_deref(), Some("-5"));

        let twice = normalize(&rendered, ParseMode::Lenient);
        assert_eq!(once.lines, twice.lines);
        assert!(twice.lines[0].has_negative_side());
    }

    #[test]
    fn test_duplicate_gets_fresh_id() {
        let original = line(Some("42"), None, None);
        let copy = original.duplicate();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.amount, original.amount);
    }
}
