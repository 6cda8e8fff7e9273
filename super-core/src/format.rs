//! Display formatting for estimate figures.
//!
//! Amounts are shown in Australian dollars with comma thousands separators
//! and exactly two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::calculations::common::round_half_up;

/// Formats an amount as currency, e.g. `$1,588.13` or `-$12.50`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use super_core::format::format_currency;
///
/// assert_eq!(format_currency(dec!(4186.87)), "$4,186.87");
/// assert_eq!(format_currency(dec!(1234567)), "$1,234,567.00");
/// assert_eq!(format_currency(dec!(-0.5)), "-$0.50");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a fractional rate as a percentage with one decimal place,
/// e.g. `0.275` becomes `27.5%`.
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.1}%")
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
