use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::VisaCategory;

/// Salary and visa held for one calendar year of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsRecord {
    pub year: i32,

    /// Gross salary for the year. Never negative.
    pub salary: Decimal,

    pub visa_category: VisaCategory,
}

impl EarningsRecord {
    pub fn new(
        year: i32,
        salary: Decimal,
        visa_category: VisaCategory,
    ) -> Self {
        Self {
            year,
            salary,
            visa_category,
        }
    }

    /// A year with nothing entered yet: zero salary on a working holiday visa.
    pub fn blank(year: i32) -> Self {
        Self::new(year, Decimal::ZERO, VisaCategory::default())
    }

    pub fn has_salary(&self) -> bool {
        self.salary > Decimal::ZERO
    }
}
