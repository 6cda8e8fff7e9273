//! Refund estimate calculations.
//!
//! The estimator turns an earnings history into an [`EstimateResult`]; the
//! reconcile module rebuilds that history when the year range moves.
//!
//! [`EstimateResult`]: crate::models::EstimateResult

pub mod common;
pub mod estimator;
pub mod reconcile;

pub use estimator::{EstimatorConfig, EstimatorConfigError, SuperEstimator, can_submit};
pub use reconcile::{CarryOverStrategy, reconcile_records, reconcile_records_by_year};
