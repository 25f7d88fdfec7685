//! Per-line aggregation into report rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::config::ReportConfig;
use super::credits::{EffectiveProduct, resolve_credits};
use super::currency::normalize_line;
use super::cut::calculate_cut;
use super::period::{PeriodLabel, label_period};
use super::tax::apply_tax;
use super::types::*;

/// How a line was sold, decided by the product's sales channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sale<'a> {
    /// Sold on the platform; the cut is derived from credits.
    Platform(EffectiveProduct<'a>),
    /// Sold outside the platform with a flat seller cut.
    Single { seller_cut: Decimal },
}

impl<'a> Sale<'a> {
    pub fn classify(line: &Line, product: &'a SubscriptionProduct, config: &ReportConfig) -> Self {
        match product.channel {
            SalesChannel::Platform => Self::Platform(resolve_credits(line, product, config)),
            SalesChannel::NonPlatform => Self::Single {
                seller_cut: product.seller_cut,
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Platform(_) => "platform",
            Self::Single { .. } => "single",
        }
    }
}

/// One row of the usage report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub invoice_number: u32,
    pub line_number: u32,
    pub product_number: String,
    pub recipient: Recipient,
    pub customer: Customer,
    pub date: NaiveDate,
    pub period: PeriodLabel,
    pub seller_cut: Decimal,
    pub platform_income: Decimal,
    pub vat: Decimal,
    pub net_amount: Decimal,
}

impl ReportLine {
    /// Net plus VAT.
    pub fn total(&self) -> Decimal {
        self.net_amount + self.vat
    }
}

/// Build the report row for `line` of `invoice`, sold as `product`.
pub fn aggregate_line(
    invoice: &Invoice,
    line: &Line,
    product: &SubscriptionProduct,
    config: &ReportConfig,
) -> ReportLine {
    let sale = Sale::classify(line, product, config);

    let (period, seller_cut, platform_income, vat, net_amount) = match sale {
        Sale::Platform(effective) => {
            let amounts = normalize_line(line, invoice, config);
            let cut = calculate_cut(&effective, amounts.net, config);
            (
                label_period(effective.period()),
                cut.seller_cut,
                cut.platform_income,
                apply_tax(&invoice.recipient, amounts.vat, config),
                amounts.net,
            )
        }
        Sale::Single { seller_cut } => {
            // Invoice-level amounts as booked: no currency conversion and
            // VAT not gated on country.
            (
                PeriodLabel::OneTime,
                seller_cut,
                (invoice.net_amount - seller_cut).max(Decimal::ZERO),
                invoice.vat_amount,
                invoice.net_amount,
            )
        }
    };

    tracing::info!(
        invoice = invoice.number,
        customer = invoice.customer.customer_number,
        product = %line.product_number(),
        sale = sale.kind(),
        net = %net_amount,
        "report line"
    );

    ReportLine {
        invoice_number: invoice.number,
        line_number: line.line_number,
        product_number: line.product_number().to_string(),
        recipient: invoice.recipient.clone(),
        customer: invoice.customer,
        date: invoice.date,
        period,
        seller_cut,
        platform_income,
        vat,
        net_amount,
    }
}
