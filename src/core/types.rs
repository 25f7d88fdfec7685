use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A booked invoice as exported by the bookkeeping system.
///
/// Field names follow the e-conomic `booked` invoice JSON, so a response body
/// deserializes directly into this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Booked invoice number.
    #[serde(rename = "bookedInvoiceNumber")]
    pub number: u32,
    /// Issue date.
    pub date: NaiveDate,
    /// ISO 4217 currency code the amounts are denominated in.
    #[serde(rename = "currency")]
    pub currency_code: String,
    pub recipient: Recipient,
    pub customer: Customer,
    /// Invoice net total. Only single-sale rows read it.
    pub net_amount: Decimal,
    /// Invoice VAT total. Only single-sale rows read it.
    pub vat_amount: Decimal,
    /// Invoice lines in booking order.
    pub lines: Vec<Line>,
}

/// Invoice recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    /// Country name as typed into the bookkeeping system (e.g. "Denmark").
    pub country: String,
}

/// Customer account the invoice was booked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_number: u32,
}

/// A single invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub line_number: u32,
    #[serde(default)]
    pub sort_key: u32,
    pub product: ProductRef,
    /// Invoiced quantity. For pay-as-you-go products this is the credit count.
    pub quantity: Decimal,
    /// Line net amount in the invoice currency.
    #[serde(rename = "totalNetAmount")]
    pub net_amount: Decimal,
    /// Line VAT amount in the invoice currency.
    pub vat_amount: Decimal,
}

impl Invoice {
    /// Parse booked invoices from JSON.
    ///
    /// Accepts either a plain array or a page of the bookkeeping API's list
    /// endpoint, where the invoices sit under `collection`.
    #[cfg(feature = "json")]
    pub fn list_from_json(json: &str) -> Result<Vec<Invoice>, super::ConfigError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Listing {
            Plain(Vec<Invoice>),
            Page { collection: Vec<Invoice> },
        }

        Ok(match serde_json::from_str(json)? {
            Listing::Plain(invoices) => invoices,
            Listing::Page { collection } => collection,
        })
    }
}

impl Line {
    pub fn product_number(&self) -> &str {
        &self.product.product_number
    }
}

/// Reference from an invoice line to a subscription product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub product_number: String,
}

/// Subscription product metadata held by the product store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionProduct {
    pub product_number: String,
    /// Monthly credit allotment. `0` means unlimited.
    pub credits: u32,
    pub period: BillingPeriod,
    /// Flat seller cut, used when the product is sold outside the platform.
    pub seller_cut: Decimal,
    /// List price. Informational, never used in calculations.
    pub total_amount: Decimal,
    pub channel: SalesChannel,
}

impl SubscriptionProduct {
    pub fn is_unlimited(&self) -> bool {
        self.credits == 0
    }

    pub fn is_single_sale(&self) -> bool {
        self.channel == SalesChannel::NonPlatform
    }
}

/// Billing period of a subscription product.
///
/// Stored as a free-form string; anything other than `month` and `year` is
/// kept verbatim in [`BillingPeriod::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingPeriod {
    Month,
    Year,
    Other(String),
}

impl BillingPeriod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for BillingPeriod {
    fn from(s: String) -> Self {
        match s.as_str() {
            "month" => Self::Month,
            "year" => Self::Year,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for BillingPeriod {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<BillingPeriod> for String {
    fn from(p: BillingPeriod) -> Self {
        match p {
            BillingPeriod::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// Where a product is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesChannel {
    /// Sold through the platform with credit-based income sharing.
    Platform,
    /// Sold outside the platform with a flat seller cut ("single sale").
    NonPlatform,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_period_parses_known_values() {
        assert_eq!(BillingPeriod::from("month"), BillingPeriod::Month);
        assert_eq!(BillingPeriod::from("year"), BillingPeriod::Year);
        assert_eq!(
            BillingPeriod::from("quarter"),
            BillingPeriod::Other("quarter".into())
        );
    }

    #[test]
    fn billing_period_is_case_sensitive() {
        assert_eq!(
            BillingPeriod::from("Month"),
            BillingPeriod::Other("Month".into())
        );
    }

    #[cfg(feature = "json")]
    const INVOICE: &str = r#"{
        "bookedInvoiceNumber": 151,
        "date": "2019-05-03",
        "currency": "DKK",
        "recipient": { "name": "Ugeavisen", "country": "Danmark" },
        "customer": { "customerNumber": 1107 },
        "netAmount": 2000,
        "vatAmount": 500,
        "lines": [{
            "lineNumber": 1,
            "product": { "productNumber": "5" },
            "quantity": 1,
            "totalNetAmount": 2000,
            "vatAmount": 500
        }]
    }"#;

    #[cfg(feature = "json")]
    #[test]
    fn invoices_from_plain_array() {
        let invoices = Invoice::list_from_json(&format!("[{INVOICE}]")).unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].number, 151);
        assert_eq!(invoices[0].customer.customer_number, 1107);
        assert_eq!(invoices[0].lines[0].product_number(), "5");
        assert_eq!(invoices[0].lines[0].sort_key, 0);
    }

    #[cfg(feature = "json")]
    #[test]
    fn invoices_from_collection_page() {
        let page = format!(r#"{{ "collection": [{INVOICE}], "pagination": {{}} }}"#);
        let invoices = Invoice::list_from_json(&page).unwrap();
        assert_eq!(invoices[0].recipient.country, "Danmark");
    }

    #[test]
    fn billing_period_round_trips_other() {
        let s: String = BillingPeriod::Other("week".into()).into();
        assert_eq!(s, "week");
    }
}
