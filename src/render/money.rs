//! Money formatting for report columns.

use num_format::{CustomFormat, Grouping, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::RenderError;

/// Formats amounts with a thousands separator, a decimal mark and two
/// decimals, e.g. `1.113,75`.
#[derive(Debug, Clone)]
pub struct MoneyFormat {
    grouping: CustomFormat,
    decimal: char,
}

impl MoneyFormat {
    /// Danish accounting style: `.` for thousands, `,` for decimals.
    pub fn danish() -> Result<Self, RenderError> {
        Self::new(".", ',')
    }

    pub fn new(thousands: &str, decimal: char) -> Result<Self, RenderError> {
        let grouping = CustomFormat::builder()
            .grouping(Grouping::Standard)
            .separator(thousands)
            .build()?;
        Ok(Self { grouping, decimal })
    }

    /// Round half away from zero to two decimals and format.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let abs = rounded.abs();
        let integer = abs.trunc();
        let cents = ((abs - integer) * Decimal::ONE_HUNDRED)
            .to_u8()
            .unwrap_or_default();
        let integer = integer
            .to_u128()
            .unwrap_or_default()
            .to_formatted_string(&self.grouping);
        format!("{sign}{integer}{}{cents:02}", self.decimal)
    }
}
