//! Superannuation refund estimator engine.
//!
//! Pure calculation and session logic with no I/O. Front ends drive an
//! [`EstimatorSession`] and render the [`EstimateResult`] it produces.

pub mod calculations;
pub mod format;
pub mod input;
pub mod models;
pub mod session;

pub use calculations::{CarryOverStrategy, EstimatorConfig, EstimatorConfigError, SuperEstimator};
pub use models::*;
pub use session::{DeferredCue, EstimatorSession, SessionError, SessionPhase, SubmitError, Submission};
