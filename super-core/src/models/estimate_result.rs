use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::format_rate;

/// Figures derived from the current earnings history.
///
/// Recomputed on demand; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateResult {
    /// Super accrued across every year, rounded to cents.
    pub total_super: Decimal,

    /// Mean of each year's visa tax rate. Not rounded.
    pub effective_tax_rate: Decimal,

    /// Tax deducted from the withdrawal, rounded to cents.
    pub tax_withheld: Decimal,

    /// Amount paid out after tax, rounded to cents.
    pub net_payout: Decimal,
}

impl EstimateResult {
    /// Effective tax rate as a percentage, e.g. `27.5%`.
    pub fn effective_tax_rate_label(&self) -> String {
        format_rate(self.effective_tax_rate)
    }
}
