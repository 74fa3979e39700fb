//! Decimal amount helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the system is a `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Number of decimal places used for display and balance comparison.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Largest amount a single line may carry: `9,999,999,999,999,999.99`.
///
/// Matches the `DECIMAL(18, 2)` money columns and keeps any realistic sum of
/// lines far from `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA763_FFFF, 0x0DE0_B6B3, 0, false, 2);

/// Rounds an amount to currency precision.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointNearestEven)
}

/// Parses user-entered amount text.
///
/// Surrounding whitespace and a leading `+` are accepted. Returns `None` when the
/// text is empty or not a decimal number. The sign is preserved; callers decide
/// what a negative amount means.
#[must_use]
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if unsigned.is_empty() {
        return None;
    }
    Decimal::from_str(unsigned).ok()
}

/// Formats an amount with thousands separators and two decimals (`1,234.50`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped}.{frac_part}")
    } else {
        format!("{grouped}.{frac_part}")
    }
}
