//! Country-gated VAT for platform lines.

use rust_decimal::Decimal;

use super::config::ReportConfig;
use super::types::Recipient;

/// VAT reported for a platform sale.
///
/// Only domestic recipients carry VAT in the report; everything else is
/// reported as zero. Single sales bypass this and report the invoice VAT.
pub fn apply_tax(recipient: &Recipient, line_vat: Decimal, config: &ReportConfig) -> Decimal {
    if config.is_domestic(&recipient.country) {
        line_vat
    } else {
        Decimal::ZERO
    }
}
