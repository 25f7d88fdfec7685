//! Effective credit allotment of a platform line.

use rust_decimal::prelude::ToPrimitive;

use super::config::ReportConfig;
use super::types::{BillingPeriod, Line, SubscriptionProduct};

/// Read-only view of a product with the credit count that applies to one
/// invoice line. The stored product is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveProduct<'a> {
    pub product: &'a SubscriptionProduct,
    /// Credits after the pay-as-you-go override and yearly scaling.
    /// `0` still means unlimited.
    pub credits: u32,
}

impl EffectiveProduct<'_> {
    pub fn product_number(&self) -> &str {
        &self.product.product_number
    }

    pub fn is_unlimited(&self) -> bool {
        self.credits == 0
    }

    pub fn period(&self) -> &BillingPeriod {
        &self.product.period
    }
}

/// Resolve the credit count for `line`.
///
/// The pay-as-you-go product takes its credits from the truncated line
/// quantity; every other product uses its configured allotment. Yearly
/// products are then scaled to twelve months.
pub fn resolve_credits<'a>(
    line: &Line,
    product: &'a SubscriptionProduct,
    config: &ReportConfig,
) -> EffectiveProduct<'a> {
    let base = if line.product_number() == config.payg_product {
        let credits = line.quantity.trunc().to_u32().unwrap_or_default();
        tracing::debug!(
            product = %line.product_number(),
            credits,
            "credits taken from pay-as-you-go quantity"
        );
        credits
    } else {
        product.credits
    };

    scale_for_period(product, base)
}

/// Attach `credits` to `product`, multiplying by 12 for yearly products.
pub fn scale_for_period(product: &SubscriptionProduct, credits: u32) -> EffectiveProduct<'_> {
    let credits = match product.period {
        BillingPeriod::Year => credits.saturating_mul(12),
        _ => credits,
    };
    EffectiveProduct { product, credits }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LineBuilder, ProductBuilder};
    use rust_decimal_macros::dec;

    #[test]
    fn payg_uses_quantity() {
        let product = ProductBuilder::new("22").credits(100).build();
        let line = LineBuilder::new(1, "22", dec!(5), dec!(500)).build();
        assert_eq!(resolve_credits(&line, &product, &ReportConfig::default()).credits, 5);
    }

    #[test]
    fn payg_truncates_fractional_quantity() {
        let product = ProductBuilder::new("22").build();
        let line = LineBuilder::new(1, "22", dec!(7.9), dec!(500)).build();
        assert_eq!(resolve_credits(&line, &product, &ReportConfig::default()).credits, 7);
    }

    #[test]
    fn payg_zero_quantity_is_zero_credits() {
        let product = ProductBuilder::new("22").credits(10).build();
        let line = LineBuilder::new(1, "22", dec!(0), dec!(0)).build();
        assert_eq!(resolve_credits(&line, &product, &ReportConfig::default()).credits, 0);
    }

    #[test]
    fn regular_product_keeps_allotment() {
        let product = ProductBuilder::new("3").credits(10).build();
        let line = LineBuilder::new(1, "3", dec!(4), dec!(1000)).build();
        assert_eq!(resolve_credits(&line, &product, &ReportConfig::default()).credits, 10);
    }

    #[test]
    fn yearly_product_scales_by_twelve() {
        let product = ProductBuilder::new("5").credits(10).period("year").build();
        let line = LineBuilder::new(1, "5", dec!(1), dec!(1000)).build();
        let eff = resolve_credits(&line, &product, &ReportConfig::default());
        assert_eq!(eff.credits, 120);
        // stored record untouched
        assert_eq!(product.credits, 10);
    }

    #[test]
    fn yearly_payg_overrides_then_scales() {
        let product = ProductBuilder::new("22").credits(1).period("year").build();
        let line = LineBuilder::new(1, "22", dec!(3), dec!(1000)).build();
        assert_eq!(resolve_credits(&line, &product, &ReportConfig::default()).credits, 36);
    }

    #[test]
    fn yearly_scaling_saturates() {
        let product = ProductBuilder::new("5").period("year").build();
        assert_eq!(scale_for_period(&product, u32::MAX).credits, u32::MAX);
    }

    #[test]
    fn unlimited_stays_unlimited_when_yearly() {
        let product = ProductBuilder::new("5").credits(0).period("year").build();
        let line = LineBuilder::new(1, "5", dec!(1), dec!(1000)).build();
        assert!(resolve_credits(&line, &product, &ReportConfig::default()).is_unlimited());
    }
}
