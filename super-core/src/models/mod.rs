mod earnings_record;
mod estimate_result;
mod visa_category;
mod year_range;

pub use earnings_record::EarningsRecord;
pub use estimate_result::EstimateResult;
pub use visa_category::{VisaCategory, VisaRates};
pub use year_range::{MAX_YEAR, MIN_YEAR, YearRange, clamp_year, derive_year_range, is_plausible_year};
