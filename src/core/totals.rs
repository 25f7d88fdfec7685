use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::sale::ReportLine;

/// Grand totals of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub seller_cut: Decimal,
    pub platform_income: Decimal,
    pub vat: Decimal,
    pub net_amount: Decimal,
}

impl Totals {
    /// Sum every field of `lines` independently. Empty input gives zeros.
    pub fn from_lines(lines: &[ReportLine]) -> Self {
        lines.iter().collect()
    }

    /// Net plus VAT.
    pub fn total(&self) -> Decimal {
        self.net_amount + self.vat
    }

    fn add_line(mut self, line: &ReportLine) -> Self {
        self.seller_cut += line.seller_cut;
        self.platform_income += line.platform_income;
        self.vat += line.vat;
        self.net_amount += line.net_amount;
        self
    }
}

impl<'a> FromIterator<&'a ReportLine> for Totals {
    fn from_iter<I: IntoIterator<Item = &'a ReportLine>>(iter: I) -> Self {
        iter.into_iter().fold(Totals::default(), Totals::add_line)
    }
}

impl<'a> std::iter::Sum<&'a ReportLine> for Totals {
    fn sum<I: Iterator<Item = &'a ReportLine>>(iter: I) -> Self {
        iter.collect()
    }
}
