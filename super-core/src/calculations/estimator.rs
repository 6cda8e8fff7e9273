//! Superannuation refund estimate.
//!
//! Derives the super accrued over a worker's stay and what is left of it
//! after the departing-worker withdrawal tax.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Total super: Σ salary × super guarantee rate, rounded once at the end |
//! | 2    | Effective tax rate: mean of each year's visa rate (default rate when there are no years) |
//! | 3    | Tax withheld: Step 1 × Step 2, rounded |
//! | 4    | Net payout: Step 1 − Step 3, rounded |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use super_core::calculations::SuperEstimator;
//! use super_core::{EarningsRecord, VisaCategory};
//!
//! let records = vec![
//!     EarningsRecord::new(2023, dec!(50000), VisaCategory::Working),
//!     EarningsRecord::new(2024, dec!(60000), VisaCategory::Skilled),
//! ];
//!
//! let estimator = SuperEstimator::default();
//! let result = estimator.estimate(&records);
//!
//! assert_eq!(result.total_super, dec!(5775.00));
//! assert_eq!(result.effective_tax_rate, dec!(0.275));
//! assert_eq!(result.tax_withheld, dec!(1588.13));
//! assert_eq!(result.net_payout, dec!(4186.87));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::models::{EarningsRecord, EstimateResult, VisaCategory, VisaRates};

/// Errors raised when an [`EstimatorConfig`] holds an unusable rate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimatorConfigError {
    /// The super guarantee rate must be in (0, 1].
    #[error("super guarantee rate must be between 0 and 1, got {0}")]
    InvalidSuperGuaranteeRate(Decimal),

    /// The fallback tax rate must be in [0, 1].
    #[error("default tax rate must be between 0 and 1, got {0}")]
    InvalidDefaultTaxRate(Decimal),

    /// A visa category's tax rate must be in [0, 1].
    #[error("tax rate for {category} visas must be between 0 and 1, got {rate}")]
    InvalidVisaRate {
        category: VisaCategory,
        rate: Decimal,
    },
}

/// Rates used by the estimator.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use super_core::calculations::EstimatorConfig;
///
/// let config = EstimatorConfig::default();
///
/// assert_eq!(config.super_guarantee_rate, dec!(0.105));
/// assert_eq!(config.default_tax_rate, dec!(0.35));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Share of salary an employer pays into super each year (10.5%).
    pub super_guarantee_rate: Decimal,

    /// Tax rate reported when there are no years to average over.
    pub default_tax_rate: Decimal,

    /// Withdrawal tax rate per visa category.
    #[serde(rename = "visa")]
    pub visa_rates: VisaRates,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            super_guarantee_rate: Decimal::new(105, 3),
            default_tax_rate: Decimal::new(35, 2),
            visa_rates: VisaRates::default(),
        }
    }
}

impl EstimatorConfig {
    /// Checks every rate lies within its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorConfigError`] if:
    /// - `super_guarantee_rate` is not in (0, 1]
    /// - `default_tax_rate` is not in [0, 1]
    /// - any visa rate is not in [0, 1]
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use super_core::calculations::{EstimatorConfig, EstimatorConfigError};
    ///
    /// let config = EstimatorConfig {
    ///     super_guarantee_rate: dec!(0),
    ///     ..EstimatorConfig::default()
    /// };
    ///
    /// assert_eq!(
    ///     config.validate(),
    ///     Err(EstimatorConfigError::InvalidSuperGuaranteeRate(dec!(0)))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), EstimatorConfigError> {
        if self.super_guarantee_rate <= Decimal::ZERO || self.super_guarantee_rate > Decimal::ONE {
            return Err(EstimatorConfigError::InvalidSuperGuaranteeRate(
                self.super_guarantee_rate,
            ));
        }
        if !is_fraction(self.default_tax_rate) {
            return Err(EstimatorConfigError::InvalidDefaultTaxRate(
                self.default_tax_rate,
            ));
        }
        if let Some((category, rate)) = self.visa_rates.iter().find(|(_, r)| !is_fraction(*r)) {
            return Err(EstimatorConfigError::InvalidVisaRate { category, rate });
        }
        Ok(())
    }
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

/// True when at least one year has a positive salary. An estimate is only
/// shown once this holds.
pub fn can_submit(records: &[EarningsRecord]) -> bool {
    records.iter().any(EarningsRecord::has_salary)
}

/// Calculator for the refund estimate.
///
/// Holds a validated [`EstimatorConfig`]; every method is a pure function of
/// its arguments and that config.
#[derive(Debug, Clone, Default)]
pub struct SuperEstimator {
    config: EstimatorConfig,
}

impl SuperEstimator {
    /// Creates an estimator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorConfigError`] if any rate is out of range.
    pub fn new(config: EstimatorConfig) -> Result<Self, EstimatorConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Tax rate for a single visa category.
    pub fn rate_for(
        &self,
        category: VisaCategory,
    ) -> Decimal {
        self.config.visa_rates.rate_for(category)
    }

    /// Runs every step and returns the full estimate.
    pub fn estimate(
        &self,
        records: &[EarningsRecord],
    ) -> EstimateResult {
        let total_super = self.total_super(records);
        let effective_tax_rate = self.effective_tax_rate(records);
        let tax_withheld = self.tax_withheld(total_super, effective_tax_rate);
        let net_payout = self.net_payout(total_super, tax_withheld);

        debug!(
            years = records.len(),
            %total_super,
            %effective_tax_rate,
            %tax_withheld,
            %net_payout,
            "estimate recomputed"
        );

        EstimateResult {
            total_super,
            effective_tax_rate,
            tax_withheld,
            net_payout,
        }
    }

    /// Step 1: super accrued across all years.
    ///
    /// Per-year contributions are summed unrounded; only the total is
    /// rounded to cents. Saturates at [`Decimal::MAX`] rather than
    /// overflowing.
    pub fn total_super(
        &self,
        records: &[EarningsRecord],
    ) -> Decimal {
        let accrued = records.iter().fold(Decimal::ZERO, |total, r| {
            total.saturating_add(r.salary.saturating_mul(self.config.super_guarantee_rate))
        });
        round_half_up(accrued)
    }

    /// Step 2: mean visa tax rate across all years.
    ///
    /// Years are grouped by category and each category's rate is weighted
    /// by how many years were spent on it, which is the same as averaging
    /// every year's rate.
    pub fn effective_tax_rate(
        &self,
        records: &[EarningsRecord],
    ) -> Decimal {
        if records.is_empty() {
            return self.config.default_tax_rate;
        }

        let mut counts: BTreeMap<VisaCategory, u32> = BTreeMap::new();
        for record in records {
            *counts.entry(record.visa_category).or_default() += 1;
        }

        let weighted: Decimal = counts
            .iter()
            .map(|(category, count)| self.rate_for(*category) * Decimal::from(*count))
            .sum();

        weighted / Decimal::from(records.len())
    }

    /// Step 3: tax deducted from the withdrawal.
    pub fn tax_withheld(
        &self,
        total_super: Decimal,
        effective_tax_rate: Decimal,
    ) -> Decimal {
        round_half_up(total_super.saturating_mul(effective_tax_rate))
    }

    /// Step 4: amount received after tax.
    pub fn net_payout(
        &self,
        total_super: Decimal,
        tax_withheld: Decimal,
    ) -> Decimal {
        round_half_up(total_super - tax_withheld)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;

    fn record(
        year: i32,
        salary: Decimal,
        visa_category: VisaCategory,
    ) -> EarningsRecord {
        EarningsRecord::new(year, salary, visa_category)
    }

    fn two_year_history() -> Vec<EarningsRecord> {
        vec![
            record(2023, dec!(50000), VisaCategory::Working),
            record(2024, dec!(60000), VisaCategory::Skilled),
        ]
    }

    // =========================================================================
    // config validation tests
    // =========================================================================

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EstimatorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_super_rate_above_one() {
        let config = EstimatorConfig {
            super_guarantee_rate: dec!(1.05),
            ..EstimatorConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(EstimatorConfigError::InvalidSuperGuaranteeRate(dec!(1.05)))
        );
    }

    #[test]
    fn validate_rejects_negative_default_tax_rate() {
        let config = EstimatorConfig {
            default_tax_rate: dec!(-0.1),
            ..EstimatorConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(EstimatorConfigError::InvalidDefaultTaxRate(dec!(-0.1)))
        );
    }

    #[test]
    fn validate_names_offending_visa_category() {
        let mut config = EstimatorConfig::default();
        config.visa_rates.temporary = dec!(1.2);

        assert_eq!(
            config.validate(),
            Err(EstimatorConfigError::InvalidVisaRate {
                category: VisaCategory::Temporary,
                rate: dec!(1.2),
            })
        );
    }

    #[test]
    fn new_refuses_invalid_config() {
        let config = EstimatorConfig {
            super_guarantee_rate: dec!(0),
            ..EstimatorConfig::default()
        };

        assert!(SuperEstimator::new(config).is_err());
    }

    // =========================================================================
    // total_super tests
    // =========================================================================

    #[test]
    fn total_super_applies_guarantee_rate() {
        let estimator = SuperEstimator::default();

        assert_eq!(estimator.total_super(&two_year_history()), dec!(5775.00));
    }

    #[test]
    fn total_super_of_no_years_is_zero() {
        let estimator = SuperEstimator::default();

        assert_eq!(estimator.total_super(&[]), dec!(0.00));
    }

    #[test]
    fn total_super_rounds_once_at_the_end() {
        let estimator = SuperEstimator::default();
        // 0.05 × 0.105 = 0.00525 per year; rounding per year would give 0.06
        let records = vec![
            record(2020, dec!(0.05), VisaCategory::Working),
            record(2021, dec!(0.05), VisaCategory::Working),
            record(2022, dec!(0.05), VisaCategory::Working),
            record(2023, dec!(0.05), VisaCategory::Working),
            record(2024, dec!(0.05), VisaCategory::Working),
            record(2025, dec!(0.05), VisaCategory::Working),
        ];

        assert_eq!(estimator.total_super(&records), dec!(0.03));
        assert_eq!(estimator.total_super(&records[..2]), dec!(0.01));
    }

    #[test]
    fn total_super_saturates_instead_of_overflowing() {
        let estimator = SuperEstimator::default();
        let records: Vec<_> = (2015..2025)
            .map(|year| record(year, Decimal::MAX, VisaCategory::Working))
            .collect();

        let result = estimator.estimate(&records);

        assert_eq!(result.total_super, Decimal::MAX);
        assert!(result.tax_withheld <= result.total_super);
        assert_eq!(result.net_payout, result.total_super - result.tax_withheld);
    }

    #[test]
    fn total_super_uses_configured_rate() {
        let config = EstimatorConfig {
            super_guarantee_rate: dec!(0.12),
            ..EstimatorConfig::default()
        };
        let estimator = SuperEstimator::new(config).unwrap();

        assert_eq!(estimator.total_super(&two_year_history()), dec!(13200.00));
    }

    // =========================================================================
    // effective_tax_rate tests
    // =========================================================================

    #[test]
    fn effective_tax_rate_of_no_years_is_default() {
        let estimator = SuperEstimator::default();

        assert_eq!(estimator.effective_tax_rate(&[]), dec!(0.35));
    }

    #[test]
    fn effective_tax_rate_averages_visa_rates() {
        let estimator = SuperEstimator::default();

        assert_eq!(estimator.effective_tax_rate(&two_year_history()), dec!(0.275));
    }

    #[test]
    fn effective_tax_rate_weights_by_years_on_each_visa() {
        let estimator = SuperEstimator::default();
        let records = vec![
            record(2021, dec!(0), VisaCategory::Student),
            record(2022, dec!(0), VisaCategory::Temporary),
            record(2023, dec!(0), VisaCategory::Student),
            record(2024, dec!(0), VisaCategory::Skilled),
        ];

        // (0.35 × 2 + 0.20 × 2) / 4
        assert_eq!(estimator.effective_tax_rate(&records), dec!(0.275));
    }

    #[test]
    fn effective_tax_rate_ignores_salary() {
        let estimator = SuperEstimator::default();
        let records = vec![
            record(2023, dec!(1000000), VisaCategory::Skilled),
            record(2024, dec!(0), VisaCategory::Other),
        ];

        assert_eq!(estimator.effective_tax_rate(&records), dec!(0.275));
    }

    // =========================================================================
    // tax_withheld / net_payout tests
    // =========================================================================

    #[test]
    fn tax_withheld_rounds_half_up() {
        let estimator = SuperEstimator::default();

        // 5775.00 × 0.275 = 1588.125
        assert_eq!(estimator.tax_withheld(dec!(5775.00), dec!(0.275)), dec!(1588.13));
    }

    #[test]
    fn net_payout_subtracts_rounded_tax() {
        let estimator = SuperEstimator::default();

        assert_eq!(estimator.net_payout(dec!(5775.00), dec!(1588.13)), dec!(4186.87));
    }

    // =========================================================================
    // estimate tests
    // =========================================================================

    #[test]
    fn estimate_two_year_scenario() {
        let estimator = SuperEstimator::default();

        let result = estimator.estimate(&two_year_history());

        assert_eq!(
            result,
            EstimateResult {
                total_super: dec!(5775.00),
                effective_tax_rate: dec!(0.275),
                tax_withheld: dec!(1588.13),
                net_payout: dec!(4186.87),
            }
        );
        assert_eq!(result.effective_tax_rate_label(), "27.5%");
    }

    #[test]
    fn estimate_with_no_years_is_all_zero_at_default_rate() {
        let estimator = SuperEstimator::default();

        let result = estimator.estimate(&[]);

        assert_eq!(result.total_super, dec!(0));
        assert_eq!(result.effective_tax_rate, dec!(0.35));
        assert_eq!(result.tax_withheld, dec!(0));
        assert_eq!(result.net_payout, dec!(0));
    }

    // =========================================================================
    // can_submit tests
    // =========================================================================

    #[test]
    fn can_submit_requires_a_positive_salary() {
        let zeros = vec![
            EarningsRecord::blank(2023),
            EarningsRecord::blank(2024),
        ];

        assert!(!can_submit(&zeros));
        assert!(!can_submit(&[]));
        assert!(can_submit(&two_year_history()));
    }

    #[test]
    fn can_submit_accepts_a_single_paid_year() {
        let records = vec![
            EarningsRecord::blank(2022),
            record(2023, dec!(0.01), VisaCategory::Other),
        ];

        assert!(can_submit(&records));
    }

    // =========================================================================
    // properties
    // =========================================================================

    fn visa_strategy() -> impl Strategy<Value = VisaCategory> {
        prop::sample::select(VisaCategory::all().to_vec())
    }

    fn history_strategy() -> impl Strategy<Value = Vec<EarningsRecord>> {
        prop::collection::vec((0u32..5_000, visa_strategy()), 0..30).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (hundreds, visa))| {
                    record(2000 + i as i32, Decimal::from(hundreds) * dec!(100), visa)
                })
                .collect()
        })
    }

    proptest! {
        // Salaries are whole hundreds so each year's contribution is an
        // exact number of cents and no rounding intervenes.
        #[test]
        fn prop_total_super_is_linear(records in history_strategy(), k in 0u32..50) {
            let estimator = SuperEstimator::default();
            let factor = Decimal::from(k);
            let scaled: Vec<_> = records
                .iter()
                .map(|r| EarningsRecord { salary: r.salary * factor, ..r.clone() })
                .collect();

            prop_assert_eq!(
                estimator.total_super(&scaled),
                estimator.total_super(&records) * factor
            );
        }

        #[test]
        fn prop_net_payout_is_total_minus_withheld(records in history_strategy()) {
            let estimator = SuperEstimator::default();

            let result = estimator.estimate(&records);

            prop_assert_eq!(result.net_payout, result.total_super - result.tax_withheld);
        }

        #[test]
        fn prop_effective_rate_stays_within_table(records in history_strategy()) {
            let estimator = SuperEstimator::default();

            let rate = estimator.effective_tax_rate(&records);

            prop_assert!(rate >= dec!(0.20) && rate <= dec!(0.35));
        }
    }
}
