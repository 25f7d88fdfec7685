//! Conversion of invoice amounts into the reporting currency.

use rust_decimal::Decimal;

use super::config::ReportConfig;
use super::types::{Invoice, Line};

/// Net and VAT amounts expressed in the reporting currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedAmounts {
    pub net: Decimal,
    pub vat: Decimal,
}

/// Convert a pair of amounts denominated in `currency_code`.
///
/// Only the configured foreign currency is converted; every other code is
/// assumed to already be the reporting currency.
pub fn normalize(
    net: Decimal,
    vat: Decimal,
    currency_code: &str,
    config: &ReportConfig,
) -> NormalizedAmounts {
    if currency_code == config.foreign_currency {
        NormalizedAmounts {
            net: net * config.conversion_rate,
            vat: vat * config.conversion_rate,
        }
    } else {
        NormalizedAmounts { net, vat }
    }
}

/// Line amounts in the reporting currency.
pub fn normalize_line(line: &Line, invoice: &Invoice, config: &ReportConfig) -> NormalizedAmounts {
    normalize(line.net_amount, line.vat_amount, &invoice.currency_code, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn euro_amounts_are_converted() {
        let n = normalize(dec!(100), dec!(20), "EUR", &ReportConfig::default());
        assert_eq!(n.net, dec!(742.5));
        assert_eq!(n.vat, dec!(148.5));
    }

    #[test]
    fn reporting_currency_passes_through() {
        let n = normalize(dec!(100), dec!(20), "DKK", &ReportConfig::default());
        assert_eq!(n, NormalizedAmounts { net: dec!(100), vat: dec!(20) });
    }

    #[test]
    fn unknown_currency_passes_through() {
        let n = normalize(dec!(100), dec!(20), "USD", &ReportConfig::default());
        assert_eq!(n.net, dec!(100));
    }

    #[test]
    fn currency_match_is_exact() {
        let n = normalize(dec!(1), dec!(1), "eur", &ReportConfig::default());
        assert_eq!(n.net, dec!(1));
    }
}
