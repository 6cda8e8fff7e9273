//! Shared helpers for estimate calculations.
//!
//! Every monetary figure the estimator reports goes through the same rounding
//! rule so that totals, tax withheld and net payout stay consistent.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to whole cents, with exact midpoints rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use super_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1588.125)), dec!(1588.13));
/// assert_eq!(round_half_up(dec!(1588.124)), dec!(1588.12));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_midpoint_up() {
        assert_eq!(round_half_up(dec!(1588.125)), dec!(1588.13));
    }

    #[test]
    fn round_half_up_rounds_below_midpoint_down() {
        assert_eq!(round_half_up(dec!(5250.0049)), dec!(5250.00));
    }

    #[test]
    fn round_half_up_keeps_cents_exact() {
        assert_eq!(round_half_up(dec!(4186.87)), dec!(4186.87));
    }

    #[test]
    fn round_half_up_rounds_negative_midpoint_away_from_zero() {
        assert_eq!(round_half_up(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn round_half_up_collapses_sub_cent_values() {
        assert_eq!(round_half_up(dec!(0.004)), dec!(0.00));
    }
}
