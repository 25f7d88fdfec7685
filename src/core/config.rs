//! Business constants for report generation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[cfg(feature = "json")]
use super::error::ConfigError;

/// Fixed EUR → DKK conversion rate.
pub const EUR_TO_DKK: Decimal = dec!(7.425);

/// Photographer share per credit, in EUR.
pub const PHOTOGRAPHER_SHARE: Decimal = dec!(15);

/// What to do when the product store cannot resolve a line's product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupFailurePolicy {
    /// Fail the whole batch. No rows are produced.
    #[default]
    AbortBatch,
    /// Drop the line, log a warning and record it in `Report::skipped`.
    SkipLine,
}

/// Configuration for a report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Currency all report amounts are expressed in.
    pub reporting_currency: String,
    /// Invoice currency that gets converted with `conversion_rate`.
    pub foreign_currency: String,
    /// Reporting-currency units per foreign-currency unit.
    pub conversion_rate: Decimal,
    /// Photographer share per credit, in foreign-currency units.
    pub photographer_share: Decimal,
    /// Pay-as-you-go product: credits come from the line quantity.
    pub payg_product: String,
    /// Product whose unlimited plans carry no seller cut.
    pub pure_income_product: String,
    /// Recipient country spellings that count as domestic for VAT.
    pub domestic_countries: Vec<String>,
    pub lookup_failure: LookupFailurePolicy,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            reporting_currency: "DKK".into(),
            foreign_currency: "EUR".into(),
            conversion_rate: EUR_TO_DKK,
            photographer_share: PHOTOGRAPHER_SHARE,
            payg_product: "22".into(),
            pure_income_product: "25".into(),
            domestic_countries: vec!["Denmark".into(), "Danmark".into()],
            lookup_failure: LookupFailurePolicy::AbortBatch,
        }
    }
}

impl ReportConfig {
    /// Seller cut per credit, in the reporting currency.
    pub fn credit_rate(&self) -> Decimal {
        self.photographer_share * self.conversion_rate
    }

    pub fn is_domestic(&self, country: &str) -> bool {
        self.domestic_countries.iter().any(|c| c == country)
    }

    /// Parse a configuration from JSON. Missing keys take their defaults.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    #[cfg(feature = "json")]
    fn check(&self) -> Result<(), ConfigError> {
        if self.conversion_rate <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "conversion_rate must be positive, got {}",
                self.conversion_rate
            )));
        }
        if self.photographer_share < Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "photographer_share must not be negative, got {}",
                self.photographer_share
            )));
        }
        if self.domestic_countries.is_empty() {
            return Err(ConfigError::Invalid(
                "domestic_countries must name at least one country".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ReportConfig`].
///
/// ```
/// use afregning::core::{LookupFailurePolicy, ReportConfigBuilder};
///
/// let config = ReportConfigBuilder::new()
///     .lookup_failure(LookupFailurePolicy::SkipLine)
///     .build();
/// assert_eq!(config.payg_product, "22");
/// ```
#[derive(Default)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currencies(
        mut self,
        reporting: impl Into<String>,
        foreign: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        self.config.reporting_currency = reporting.into();
        self.config.foreign_currency = foreign.into();
        self.config.conversion_rate = rate;
        self
    }

    pub fn photographer_share(mut self, share: Decimal) -> Self {
        self.config.photographer_share = share;
        self
    }

    pub fn payg_product(mut self, product_number: impl Into<String>) -> Self {
        self.config.payg_product = product_number.into();
        self
    }

    pub fn pure_income_product(mut self, product_number: impl Into<String>) -> Self {
        self.config.pure_income_product = product_number.into();
        self
    }

    /// Replace the domestic country spellings.
    pub fn domestic_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.domestic_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn lookup_failure(mut self, policy: LookupFailurePolicy) -> Self {
        self.config.lookup_failure = policy;
        self
    }

    pub fn build(self) -> ReportConfig {
        self.config
    }
}
