use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Visa held by the worker during a given year.
///
/// The category determines the tax rate applied when the accrued super is
/// withdrawn on departure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisaCategory {
    #[default]
    Working,
    Student,
    Skilled,
    Temporary,
    Other,
}

impl VisaCategory {
    pub fn all() -> &'static [VisaCategory] {
        &[
            VisaCategory::Working,
            VisaCategory::Student,
            VisaCategory::Skilled,
            VisaCategory::Temporary,
            VisaCategory::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Student => "student",
            Self::Skilled => "skilled",
            Self::Temporary => "temporary",
            Self::Other => "other",
        }
    }

    /// Case-insensitive lookup by code. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "working" => Some(Self::Working),
            "student" => Some(Self::Student),
            "skilled" => Some(Self::Skilled),
            "temporary" => Some(Self::Temporary),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Working => "Working Holiday",
            Self::Student => "Student Visa",
            Self::Skilled => "Skilled Visa",
            Self::Temporary => "Temporary Work",
            Self::Other => "Other",
        }
    }

    /// Withdrawal tax rate used when no rate table is configured.
    pub fn default_rate(&self) -> Decimal {
        match self {
            Self::Working | Self::Student | Self::Other => Decimal::new(35, 2),
            Self::Skilled | Self::Temporary => Decimal::new(20, 2),
        }
    }
}

impl fmt::Display for VisaCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Withdrawal tax rate for each visa category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisaRates {
    pub working: Decimal,
    pub student: Decimal,
    pub skilled: Decimal,
    pub temporary: Decimal,
    pub other: Decimal,
}

impl Default for VisaRates {
    fn default() -> Self {
        Self {
            working: VisaCategory::Working.default_rate(),
            student: VisaCategory::Student.default_rate(),
            skilled: VisaCategory::Skilled.default_rate(),
            temporary: VisaCategory::Temporary.default_rate(),
            other: VisaCategory::Other.default_rate(),
        }
    }
}

impl VisaRates {
    pub fn rate_for(
        &self,
        category: VisaCategory,
    ) -> Decimal {
        match category {
            VisaCategory::Working => self.working,
            VisaCategory::Student => self.student,
            VisaCategory::Skilled => self.skilled,
            VisaCategory::Temporary => self.temporary,
            VisaCategory::Other => self.other,
        }
    }

    /// Iterates the table in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (VisaCategory, Decimal)> + '_ {
        VisaCategory::all()
            .iter()
            .map(move |category| (*category, self.rate_for(*category)))
    }
}
