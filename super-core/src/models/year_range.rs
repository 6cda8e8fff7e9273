use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Earliest year accepted as an arrival or departure.
pub const MIN_YEAR: i32 = 1900;

/// Latest year accepted as an arrival or departure.
pub const MAX_YEAR: i32 = 2200;

/// Pulls `year` into [`MIN_YEAR`, `MAX_YEAR`]. Keeps every range small
/// enough to hold one record per year.
pub fn clamp_year(year: i32) -> i32 {
    year.clamp(MIN_YEAR, MAX_YEAR)
}

/// Whether `year` lies in [`MIN_YEAR`, `MAX_YEAR`].
pub fn is_plausible_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Inclusive span of calendar years between arrival and departure.
///
/// A range whose start lies after its end is empty rather than invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(
        start: i32,
        end: i32,
    ) -> Self {
        Self { start, end }
    }

    /// The range shown before the user has entered anything: last year and
    /// this year.
    pub fn default_for(current_year: i32) -> Self {
        Self::new(current_year - 1, current_year)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (i64::from(self.end) - i64::from(self.start) + 1) as usize
        }
    }

    pub fn contains(
        &self,
        year: i32,
    ) -> bool {
        self.start <= year && year <= self.end
    }

    /// Zero-based position of `year` within the range.
    pub fn position(
        &self,
        year: i32,
    ) -> Option<usize> {
        self.contains(year)
            .then(|| (i64::from(year) - i64::from(self.start)) as usize)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }
}

/// Expands arrival and departure years into the ascending list of years
/// worked. Empty when `arrival_year > departure_year`.
pub fn derive_year_range(
    arrival_year: i32,
    departure_year: i32,
) -> Vec<i32> {
    YearRange::new(arrival_year, departure_year).years().collect()
}
