//! Report period labels.

use serde::{Deserialize, Serialize};

use super::types::BillingPeriod;

/// Period column of a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodLabel {
    Month,
    Year,
    /// Single sale outside the platform.
    OneTime,
    /// Billing period not recognized.
    Unknown,
}

impl PeriodLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "MONTH",
            Self::Year => "YEAR",
            Self::OneTime => "ONE-TIME",
            Self::Unknown => "%",
        }
    }
}

impl std::fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label for a platform sale billed with `period`.
pub fn label_period(period: &BillingPeriod) -> PeriodLabel {
    match period {
        BillingPeriod::Month => PeriodLabel::Month,
        BillingPeriod::Year => PeriodLabel::Year,
        BillingPeriod::Other(_) => PeriodLabel::Unknown,
    }
}
