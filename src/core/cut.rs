//! Seller cut and platform income of a platform sale.

use rust_decimal::Decimal;

use super::config::ReportConfig;
use super::credits::EffectiveProduct;

/// Split of a platform line's net amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cut {
    /// Maximum amount owed to the seller.
    pub seller_cut: Decimal,
    /// Minimum amount retained by the platform. Never negative.
    pub platform_income: Decimal,
}

impl Cut {
    const NONE: Self = Self {
        seller_cut: Decimal::ZERO,
        platform_income: Decimal::ZERO,
    };
}

/// Compute the cut for a line with net amount `net` (reporting currency).
///
/// - limited credits and a positive net: the seller gets the per-credit rate
///   for every credit, the platform keeps the rest (floored at zero).
/// - unlimited credits: the seller gets the whole net and the platform
///   income is zero.
/// - unlimited credits on the pure-income product: both are zero. The
///   platform income of these lines is under-reported, see invoice 151.
/// - limited credits with a zero net: both are zero.
pub fn calculate_cut(product: &EffectiveProduct<'_>, net: Decimal, config: &ReportConfig) -> Cut {
    if !product.is_unlimited() && net > Decimal::ZERO {
        let seller_cut = config.credit_rate() * Decimal::from(product.credits);
        let platform_income = (net - seller_cut.abs()).max(Decimal::ZERO);
        return Cut {
            seller_cut,
            platform_income,
        };
    }

    if product.is_unlimited() && product.product_number() != config.pure_income_product {
        tracing::debug!(product = %product.product_number(), "unlimited plan, full net to seller");
        return Cut {
            seller_cut: net,
            platform_income: Decimal::ZERO,
        };
    }

    Cut::NONE
}
