//! Rebuilding the earnings history after the year range changes.

use serde::{Deserialize, Serialize};

use crate::models::{EarningsRecord, YearRange};

/// How previously entered values survive a change of year range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarryOverStrategy {
    /// Keep entries by position: the first row stays the first row even when
    /// the arrival year moves, so its values land on a different calendar
    /// year.
    #[default]
    Positional,

    /// Keep entries whose calendar year is still inside the new range.
    ByYear,
}

impl CarryOverStrategy {
    pub fn reconcile(
        self,
        old_range: YearRange,
        new_range: YearRange,
        old_records: &[EarningsRecord],
    ) -> Vec<EarningsRecord> {
        match self {
            Self::Positional => reconcile_records(old_range, new_range, old_records),
            Self::ByYear => reconcile_records_by_year(new_range, old_records),
        }
    }
}

/// Positional carry-over.
///
/// Index `i` of the new range keeps `old_records[i]` (stamped with its new
/// year) when `i` was inside the old range, otherwise it starts blank.
/// A missing old record is treated as blank.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use super_core::calculations::reconcile_records;
/// use super_core::{EarningsRecord, VisaCategory, YearRange};
///
/// let old = vec![EarningsRecord::new(2023, dec!(50000), VisaCategory::Skilled)];
/// let new = reconcile_records(YearRange::new(2023, 2023), YearRange::new(2023, 2024), &old);
///
/// assert_eq!(new[0], EarningsRecord::new(2023, dec!(50000), VisaCategory::Skilled));
/// assert_eq!(new[1], EarningsRecord::blank(2024));
/// ```
pub fn reconcile_records(
    old_range: YearRange,
    new_range: YearRange,
    old_records: &[EarningsRecord],
) -> Vec<EarningsRecord> {
    let carried = old_range.len();

    new_range
        .years()
        .enumerate()
        .map(|(idx, year)| match old_records.get(idx) {
            Some(previous) if idx < carried => EarningsRecord { year, ..previous.clone() },
            _ => EarningsRecord::blank(year),
        })
        .collect()
}

/// Year-keyed carry-over: a record survives only if its year is still in
/// `new_range`.
pub fn reconcile_records_by_year(
    new_range: YearRange,
    old_records: &[EarningsRecord],
) -> Vec<EarningsRecord> {
    new_range
        .years()
        .map(|year| {
            old_records
                .iter()
                .find(|r| r.year == year)
                .cloned()
                .unwrap_or_else(|| EarningsRecord::blank(year))
        })
        .collect()
}
