//! Estimator session state.
//!
//! An [`EstimatorSession`] is the single owner of the user's entries. It
//! keeps the year range and earnings history in step, recomputes the
//! estimate on demand and tracks whether results are being shown.
//!
//! # Phases
//!
//! ```text
//!            calculate() [at least one salary > 0]
//!   Input  ──────────────────────────────────────▶  ShowingResults
//!     ▲                                                   │
//!     └───────────────────────── reset() ─────────────────┘
//! ```
//!
//! A `calculate()` with no salary entered is refused and the phase does not
//! change.

use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::{CarryOverStrategy, SuperEstimator, can_submit};
use crate::input::{MAX_SALARY, coerce_salary, coerce_year};
use crate::models::{EarningsRecord, EstimateResult, VisaCategory, YearRange, clamp_year};

/// Whether the session is collecting input or presenting an estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Input,
    ShowingResults,
}

/// A one-shot UI action to run after a short delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredCue {
    /// Bring the results area into view after a successful calculation.
    RevealResults,

    /// Clear a transient notice.
    DismissNotice,
}

impl DeferredCue {
    pub fn delay(&self) -> Duration {
        match self {
            Self::RevealResults => Duration::from_millis(100),
            Self::DismissNotice => Duration::from_secs(5),
        }
    }
}

/// Errors from editing an entry that does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no year at position {index}; the range has {len} year(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Reasons a calculation request is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please enter at least one salary amount")]
    NoSalaryEntered,
}

impl SubmitError {
    /// The notice shown for this refusal is cleared by this cue.
    pub fn cue(&self) -> DeferredCue {
        DeferredCue::DismissNotice
    }
}

/// Outcome of an accepted calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub result: EstimateResult,
    pub cue: DeferredCue,
}

/// The user's entries plus the derived estimate.
#[derive(Debug, Clone)]
pub struct EstimatorSession {
    current_year: i32,
    arrival_year: i32,
    departure_year: i32,
    range: YearRange,
    records: Vec<EarningsRecord>,
    carry_over: CarryOverStrategy,
    estimator: SuperEstimator,
    phase: SessionPhase,
}

impl EstimatorSession {
    /// Starts a session on the default range (last year to `current_year`)
    /// with every year blank.
    pub fn new(
        current_year: i32,
        estimator: SuperEstimator,
    ) -> Self {
        let range = YearRange::default_for(current_year);
        Self {
            current_year,
            arrival_year: range.start,
            departure_year: range.end,
            range,
            records: blank_records(range),
            carry_over: CarryOverStrategy::default(),
            estimator,
            phase: SessionPhase::Input,
        }
    }

    pub fn with_carry_over(
        mut self,
        strategy: CarryOverStrategy,
    ) -> Self {
        self.carry_over = strategy;
        self
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn arrival_year(&self) -> i32 {
        self.arrival_year
    }

    pub fn departure_year(&self) -> i32 {
        self.departure_year
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn records(&self) -> &[EarningsRecord] {
        &self.records
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn carry_over(&self) -> CarryOverStrategy {
        self.carry_over
    }

    pub fn estimator(&self) -> &SuperEstimator {
        &self.estimator
    }

    /// Sets the arrival year from form text. Unreadable text selects the
    /// default arrival year.
    pub fn set_arrival_year(
        &mut self,
        input: &str,
    ) {
        let year = coerce_year(input, self.current_year - 1);
        self.set_arrival(year);
    }

    /// Sets the departure year from form text. Unreadable text selects the
    /// current year.
    pub fn set_departure_year(
        &mut self,
        input: &str,
    ) {
        let year = coerce_year(input, self.current_year);
        self.set_departure(year);
    }

    /// Sets the arrival year, pulled into [`MIN_YEAR`]..=[`MAX_YEAR`].
    ///
    /// [`MIN_YEAR`]: crate::models::MIN_YEAR
    /// [`MAX_YEAR`]: crate::models::MAX_YEAR
    pub fn set_arrival(
        &mut self,
        year: i32,
    ) {
        self.arrival_year = clamp_plausible(year);
        self.update_range();
    }

    /// Sets the departure year, pulled into the same window as arrival.
    pub fn set_departure(
        &mut self,
        year: i32,
    ) {
        self.departure_year = clamp_plausible(year);
        self.update_range();
    }

    /// Sets the salary for the year at `index` from form text.
    pub fn set_salary(
        &mut self,
        index: usize,
        input: &str,
    ) -> Result<(), SessionError> {
        self.set_salary_amount(index, coerce_salary(input))
    }

    /// Sets an already-parsed salary. Negative amounts are stored as zero
    /// and amounts above [`MAX_SALARY`] are capped.
    pub fn set_salary_amount(
        &mut self,
        index: usize,
        salary: Decimal,
    ) -> Result<(), SessionError> {
        self.record_mut(index)?.salary = salary.clamp(Decimal::ZERO, MAX_SALARY);
        Ok(())
    }

    pub fn set_visa_category(
        &mut self,
        index: usize,
        category: VisaCategory,
    ) -> Result<(), SessionError> {
        self.record_mut(index)?.visa_category = category;
        Ok(())
    }

    /// The estimate for the current entries. Available in either phase.
    pub fn estimate(&self) -> EstimateResult {
        self.estimator.estimate(&self.records)
    }

    pub fn can_submit(&self) -> bool {
        can_submit(&self.records)
    }

    /// Moves to [`SessionPhase::ShowingResults`] if any salary has been
    /// entered.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::NoSalaryEntered`] when every salary is zero;
    /// the session is left untouched.
    pub fn calculate(&mut self) -> Result<Submission, SubmitError> {
        if !self.can_submit() {
            warn!(years = self.records.len(), "calculation refused: no salary entered");
            return Err(SubmitError::NoSalaryEntered);
        }

        let result = self.estimate();
        self.phase = SessionPhase::ShowingResults;
        info!(
            years = self.records.len(),
            net_payout = %result.net_payout,
            "showing estimate"
        );

        Ok(Submission {
            result,
            cue: DeferredCue::RevealResults,
        })
    }

    /// Restores the default range, clears every entry and returns to
    /// [`SessionPhase::Input`].
    pub fn reset(&mut self) {
        let range = YearRange::default_for(self.current_year);
        self.arrival_year = range.start;
        self.departure_year = range.end;
        self.range = range;
        self.records = blank_records(range);
        self.phase = SessionPhase::Input;
        info!("session reset");
    }

    fn update_range(&mut self) {
        let new_range = YearRange::new(self.arrival_year, self.departure_year);
        if new_range == self.range {
            return;
        }

        self.records = self
            .carry_over
            .reconcile(self.range, new_range, &self.records);
        debug!(
            from = ?self.range,
            to = ?new_range,
            years = self.records.len(),
            "year range changed"
        );
        self.range = new_range;
    }

    fn record_mut(
        &mut self,
        index: usize,
    ) -> Result<&mut EarningsRecord, SessionError> {
        let len = self.records.len();
        self.records
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })
    }
}

fn clamp_plausible(year: i32) -> i32 {
    let clamped = clamp_year(year);
    if clamped != year {
        warn!(year, clamped, "year outside the supported window");
    }
    clamped
}

fn blank_records(range: YearRange) -> Vec<EarningsRecord> {
    range.years().map(EarningsRecord::blank).collect()
}
