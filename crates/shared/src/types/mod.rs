//! Common types used across the application.

pub mod id;
pub mod mode;
pub mod money;

pub use id::*;
pub use mode::{GateMode, ParseMode, ValidationMode};
pub use money::{CURRENCY_DECIMALS, MAX_AMOUNT, format_amount, parse_amount, round_currency};
