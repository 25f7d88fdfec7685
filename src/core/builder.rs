//! Builders for invoices, lines and products.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::*;
use super::validation;

/// Builder for booked invoices.
///
/// ```
/// use afregning::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = InvoiceBuilder::new(151, NaiveDate::from_ymd_opt(2019, 5, 3).unwrap())
///     .recipient("Bladet A/S", "Denmark")
///     .customer(1105)
///     .add_line(LineBuilder::new(1, "3", dec!(1), dec!(1000)).vat(dec!(250)).build())
///     .build()
///     .unwrap();
/// assert_eq!(invoice.net_amount, dec!(1000));
/// ```
pub struct InvoiceBuilder {
    number: u32,
    date: NaiveDate,
    currency_code: String,
    recipient: Option<Recipient>,
    customer: Option<Customer>,
    net_amount: Option<Decimal>,
    vat_amount: Option<Decimal>,
    lines: Vec<Line>,
}

impl InvoiceBuilder {
    pub fn new(number: u32, date: NaiveDate) -> Self {
        Self {
            number,
            date,
            currency_code: "DKK".to_string(),
            recipient: None,
            customer: None,
            net_amount: None,
            vat_amount: None,
            lines: Vec::new(),
        }
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    pub fn recipient(mut self, name: impl Into<String>, country: impl Into<String>) -> Self {
        self.recipient = Some(Recipient {
            name: name.into(),
            country: country.into(),
        });
        self
    }

    pub fn customer(mut self, customer_number: u32) -> Self {
        self.customer = Some(Customer { customer_number });
        self
    }

    /// Invoice-level net total. Defaults to the sum of the line net amounts.
    pub fn net_amount(mut self, amount: Decimal) -> Self {
        self.net_amount = Some(amount);
        self
    }

    /// Invoice-level VAT total. Defaults to the sum of the line VAT amounts.
    pub fn vat_amount(mut self, amount: Decimal) -> Self {
        self.vat_amount = Some(amount);
        self
    }

    pub fn add_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    /// Build the invoice and validate it.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Invoice, ReportError> {
        let invoice = self.build_unchecked()?;
        let errors = validation::validate_invoice(&invoice);
        if !errors.is_empty() {
            return Err(ReportError::MalformedInput(errors));
        }
        Ok(invoice)
    }

    /// Build without validation.
    pub fn build_unchecked(self) -> Result<Invoice, ReportError> {
        let recipient = self
            .recipient
            .ok_or_else(|| ReportError::Builder("recipient is required".into()))?;
        let customer = self
            .customer
            .ok_or_else(|| ReportError::Builder("customer is required".into()))?;

        let net_amount = self
            .net_amount
            .unwrap_or_else(|| self.lines.iter().map(|l| l.net_amount).sum());
        let vat_amount = self
            .vat_amount
            .unwrap_or_else(|| self.lines.iter().map(|l| l.vat_amount).sum());

        Ok(Invoice {
            number: self.number,
            date: self.date,
            currency_code: self.currency_code,
            recipient,
            customer,
            net_amount,
            vat_amount,
            lines: self.lines,
        })
    }
}

/// Builder for invoice lines.
pub struct LineBuilder {
    line_number: u32,
    sort_key: Option<u32>,
    product_number: String,
    quantity: Decimal,
    net_amount: Decimal,
    vat_amount: Decimal,
}

impl LineBuilder {
    pub fn new(
        line_number: u32,
        product_number: impl Into<String>,
        quantity: Decimal,
        net_amount: Decimal,
    ) -> Self {
        Self {
            line_number,
            sort_key: None,
            product_number: product_number.into(),
            quantity,
            net_amount,
            vat_amount: Decimal::ZERO,
        }
    }

    pub fn vat(mut self, amount: Decimal) -> Self {
        self.vat_amount = amount;
        self
    }

    /// Defaults to the line number.
    pub fn sort_key(mut self, key: u32) -> Self {
        self.sort_key = Some(key);
        self
    }

    pub fn build(self) -> Line {
        Line {
            line_number: self.line_number,
            sort_key: self.sort_key.unwrap_or(self.line_number),
            product: ProductRef {
                product_number: self.product_number,
            },
            quantity: self.quantity,
            net_amount: self.net_amount,
            vat_amount: self.vat_amount,
        }
    }
}

/// Builder for subscription products. Defaults to an unlimited monthly
/// platform product.
pub struct ProductBuilder {
    product_number: String,
    credits: u32,
    period: BillingPeriod,
    seller_cut: Decimal,
    total_amount: Decimal,
    channel: SalesChannel,
}

impl ProductBuilder {
    pub fn new(product_number: impl Into<String>) -> Self {
        Self {
            product_number: product_number.into(),
            credits: 0,
            period: BillingPeriod::Month,
            seller_cut: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            channel: SalesChannel::Platform,
        }
    }

    pub fn credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    pub fn period(mut self, period: impl Into<BillingPeriod>) -> Self {
        self.period = period.into();
        self
    }

    pub fn total_amount(mut self, amount: Decimal) -> Self {
        self.total_amount = amount;
        self
    }

    /// Mark the product as sold outside the platform with a flat seller cut.
    pub fn single_sale(mut self, seller_cut: Decimal) -> Self {
        self.channel = SalesChannel::NonPlatform;
        self.seller_cut = seller_cut;
        self
    }

    pub fn build(self) -> SubscriptionProduct {
        SubscriptionProduct {
            product_number: self.product_number,
            credits: self.credits,
            period: self.period,
            seller_cut: self.seller_cut,
            total_amount: self.total_amount,
            channel: self.channel,
        }
    }
}
