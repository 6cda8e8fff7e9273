//! Coercion of raw form input into typed values.
//!
//! Free-text fields never block an estimate: a year that cannot be read falls
//! back to a default and a salary that cannot be read counts as zero.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::models::{MAX_YEAR, MIN_YEAR, is_plausible_year};

/// Largest salary accepted for a single year (one billion dollars). Larger
/// amounts are capped to it.
pub const MAX_SALARY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and drops a leading `$` and any comma separators.
fn normalize_amount(s: &str) -> String {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    unsigned.replace(',', "")
}

/// Parses an amount such as `"1,234.56"` or `"$60000"`.
///
/// Empty input is zero. Anything else that is not a number is an error.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_amount(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|source| ParseDecimalError {
        input: s.to_string(),
        source,
    })
}

/// Reads a salary field. Unreadable or negative input counts as zero and
/// anything above [`MAX_SALARY`] is capped.
pub fn coerce_salary(s: &str) -> Decimal {
    match parse_decimal(s) {
        Ok(value) if value < Decimal::ZERO => {
            warn!(input = %s, "negative salary treated as zero");
            Decimal::ZERO
        }
        Ok(value) if value > MAX_SALARY => {
            warn!(input = %s, cap = %MAX_SALARY, "salary capped");
            MAX_SALARY
        }
        Ok(value) => value,
        Err(e) => {
            warn!(input = %s, "unreadable salary treated as zero: {}", e);
            Decimal::ZERO
        }
    }
}

/// Reads a year field.
///
/// Only the leading integer is considered, so `"2023.5"` reads as 2023.
/// Input with no leading integer, or a year outside
/// [`MIN_YEAR`]..=[`MAX_YEAR`], gives `fallback`.
pub fn coerce_year(
    s: &str,
    fallback: i32,
) -> i32 {
    match leading_integer(s) {
        Some(year) if is_plausible_year(year) => year,
        Some(year) => {
            warn!(
                input = %s,
                year,
                min = MIN_YEAR,
                max = MAX_YEAR,
                fallback,
                "year out of range replaced with default"
            );
            fallback
        }
        None => {
            if !s.trim().is_empty() {
                warn!(input = %s, fallback, "unreadable year replaced with default");
            }
            fallback
        }
    }
}

fn leading_integer(s: &str) -> Option<i32> {
    let trimmed = s.trim_start();
    let digits_start = usize::from(trimmed.starts_with(['-', '+']));
    let digits_len = trimmed[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len() - digits_start);

    if digits_len == 0 {
        return None;
    }
    trimmed[..digits_start + digits_len].parse().ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // parse_decimal tests
    // =========================================================================

    #[test]
    fn parse_decimal_accepts_thousands_separators() {
        assert_eq!(parse_decimal("60,000.50").unwrap(), dec!(60000.50));
    }

    #[test]
    fn parse_decimal_accepts_dollar_prefix() {
        assert_eq!(parse_decimal(" $1,250 ").unwrap(), dec!(1250));
    }

    #[test]
    fn parse_decimal_empty_is_zero() {
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_rejects_text() {
        assert!(parse_decimal("fifty thousand").is_err());
    }

    // =========================================================================
    // coerce_salary tests
    // =========================================================================

    #[test]
    fn coerce_salary_reads_plain_amount() {
        assert_eq!(coerce_salary("52000"), dec!(52000));
    }

    #[test]
    fn coerce_salary_unreadable_is_zero() {
        assert_eq!(coerce_salary("n/a"), Decimal::ZERO);
    }

    #[test]
    fn coerce_salary_negative_is_zero() {
        assert_eq!(coerce_salary("-300"), Decimal::ZERO);
    }

    #[test]
    fn coerce_salary_caps_huge_amounts() {
        assert_eq!(coerce_salary("79228162514264337593543950335"), MAX_SALARY);
        assert_eq!(coerce_salary("1,000,000,000"), dec!(1000000000));
        assert_eq!(MAX_SALARY, dec!(1000000000));
    }

    // =========================================================================
    // coerce_year tests
    // =========================================================================

    #[test]
    fn coerce_year_reads_integer() {
        assert_eq!(coerce_year(" 2021 ", 2025), 2021);
    }

    #[test]
    fn coerce_year_ignores_trailing_text() {
        assert_eq!(coerce_year("2023.7", 2025), 2023);
        assert_eq!(coerce_year("2019abc", 2025), 2019);
    }

    #[test]
    fn coerce_year_falls_back_on_garbage() {
        assert_eq!(coerce_year("next year", 2025), 2025);
        assert_eq!(coerce_year("", 2025), 2025);
        assert_eq!(coerce_year("-", 2025), 2025);
    }

    #[test]
    fn coerce_year_treats_zero_as_missing() {
        assert_eq!(coerce_year("0", 2025), 2025);
    }

    #[test]
    fn coerce_year_falls_back_outside_window() {
        assert_eq!(coerce_year("-2000000000", 2024), 2024);
        assert_eq!(coerce_year("2000000000", 2025), 2025);
        assert_eq!(coerce_year("1899", 2025), 2025);
        assert_eq!(coerce_year("1900", 2025), 1900);
    }

    #[test]
    fn coerce_year_falls_back_on_overflow() {
        assert_eq!(coerce_year("99999999999", 2025), 2025);
    }
}
