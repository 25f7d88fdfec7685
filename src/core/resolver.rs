//! Subscription product lookup.
//!
//! The engine asks a [`ProductResolver`] for every invoice line. Stores are
//! external; this module provides the trait, an in-memory [`ProductCatalog`]
//! (loadable from the product store's JSON export) and a [`CachingResolver`]
//! that memoizes any other resolver without changing its answers.

use std::collections::BTreeMap;

use moka::sync::Cache;

#[cfg(feature = "json")]
use rust_decimal::Decimal;
#[cfg(feature = "json")]
use serde::Deserialize;

use super::error::LookupError;
use super::types::SubscriptionProduct;

#[cfg(feature = "json")]
use super::error::ConfigError;
#[cfg(feature = "json")]
use super::types::{BillingPeriod, SalesChannel};

/// Source of subscription product metadata, keyed by product number.
pub trait ProductResolver {
    fn resolve(&self, product_number: &str) -> Result<SubscriptionProduct, LookupError>;
}

impl<R: ProductResolver + ?Sized> ProductResolver for &R {
    fn resolve(&self, product_number: &str) -> Result<SubscriptionProduct, LookupError> {
        (**self).resolve(product_number)
    }
}

impl<R: ProductResolver + ?Sized> ProductResolver for Box<R> {
    fn resolve(&self, product_number: &str) -> Result<SubscriptionProduct, LookupError> {
        (**self).resolve(product_number)
    }
}

/// In-memory product store.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: BTreeMap<String, SubscriptionProduct>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product under its own product number.
    pub fn insert(&mut self, product: SubscriptionProduct) {
        self.products.insert(product.product_number.clone(), product);
    }

    pub fn with(mut self, product: SubscriptionProduct) -> Self {
        self.insert(product);
        self
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load the `subscriptionProducts` node of the product store export:
    /// an object mapping product numbers to product documents.
    ///
    /// ```json
    /// { "22": { "credits": 0, "id": "payg", "period": "month" },
    ///   "11": { "id": "nonplatform", "photoCut": 300 } }
    /// ```
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let docs: BTreeMap<String, ProductDocument> = serde_json::from_str(json)?;
        Ok(docs
            .into_iter()
            .map(|(number, doc)| doc.into_product(number))
            .collect())
    }
}

impl FromIterator<SubscriptionProduct> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = SubscriptionProduct>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for product in iter {
            catalog.insert(product);
        }
        catalog
    }
}

impl ProductResolver for ProductCatalog {
    fn resolve(&self, product_number: &str) -> Result<SubscriptionProduct, LookupError> {
        self.products
            .get(product_number)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(product_number.to_string()))
    }
}

/// Marker stored in a product document's `id` for products sold outside
/// the platform.
#[cfg(feature = "json")]
const NON_PLATFORM_ID: &str = "nonplatform";

/// A product as stored in the product store. The product number is the
/// document key, not a field.
#[cfg(feature = "json")]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    #[serde(default)]
    credits: u32,
    #[serde(default)]
    id: String,
    #[serde(default)]
    period: String,
    #[serde(default)]
    photo_cut: Decimal,
    #[serde(default)]
    total_amount: Decimal,
}

#[cfg(feature = "json")]
impl ProductDocument {
    fn into_product(self, product_number: String) -> SubscriptionProduct {
        let channel = if self.id == NON_PLATFORM_ID {
            SalesChannel::NonPlatform
        } else {
            SalesChannel::Platform
        };
        SubscriptionProduct {
            product_number,
            credits: self.credits,
            period: BillingPeriod::from(self.period),
            seller_cut: self.photo_cut,
            total_amount: self.total_amount,
            channel,
        }
    }
}

/// Default number of products kept by a [`CachingResolver`].
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Memoizes successful lookups of an inner resolver.
///
/// Failures are not cached, so a transient outage does not poison later
/// lookups.
pub struct CachingResolver<R> {
    inner: R,
    cache: Cache<String, SubscriptionProduct>,
}

impl<R: ProductResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: R, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Number of distinct products cached so far.
    pub fn cached(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Drops every cached product.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<R: ProductResolver> ProductResolver for CachingResolver<R> {
    fn resolve(&self, product_number: &str) -> Result<SubscriptionProduct, LookupError> {
        if let Some(product) = self.cache.get(product_number) {
            return Ok(product);
        }
        let product = self.inner.resolve(product_number)?;
        self.cache.insert(product_number.to_string(), product.clone());
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProductBuilder;
    use std::cell::Cell;

    struct Counting<'a> {
        catalog: ProductCatalog,
        calls: &'a Cell<usize>,
    }

    impl ProductResolver for Counting<'_> {
        fn resolve(&self, n: &str) -> Result<SubscriptionProduct, LookupError> {
            self.calls.set(self.calls.get() + 1);
            self.catalog.resolve(n)
        }
    }

    #[test]
    fn catalog_resolves_and_misses() {
        let catalog = ProductCatalog::new().with(ProductBuilder::new("3").credits(10).build());
        assert_eq!(catalog.resolve("3").unwrap().credits, 10);
        assert_eq!(
            catalog.resolve("4").unwrap_err(),
            LookupError::NotFound("4".into())
        );
    }

    #[test]
    fn cache_hits_inner_once_per_product() {
        let calls = Cell::new(0);
        let resolver = CachingResolver::new(Counting {
            catalog: ProductCatalog::new().with(ProductBuilder::new("3").build()),
            calls: &calls,
        });
        for _ in 0..5 {
            resolver.resolve("3").unwrap();
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(resolver.cached(), 1);
    }

    #[test]
    fn cache_does_not_store_failures() {
        let calls = Cell::new(0);
        let resolver = CachingResolver::new(Counting {
            catalog: ProductCatalog::new(),
            calls: &calls,
        });
        assert!(resolver.resolve("9").is_err());
        assert!(resolver.resolve("9").is_err());
        assert_eq!(calls.get(), 2);
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn invalidated_cache_asks_inner_again() {
        let calls = Cell::new(0);
        let resolver = CachingResolver::new(Counting {
            catalog: ProductCatalog::new().with(ProductBuilder::new("3").build()),
            calls: &calls,
        });
        resolver.resolve("3").unwrap();
        resolver.invalidate_all();
        resolver.resolve("3").unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn caching_resolver_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<CachingResolver<ProductCatalog>>();

        let resolver = CachingResolver::new(
            ProductCatalog::new().with(ProductBuilder::new("3").credits(10).build()),
        );
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert_eq!(resolver.resolve("3").unwrap().credits, 10));
            }
        });
        assert_eq!(resolver.cached(), 1);
    }

    #[test]
    fn resolver_by_reference() {
        let catalog = ProductCatalog::new().with(ProductBuilder::new("3").build());
        let by_ref: &dyn ProductResolver = &catalog;
        assert!(by_ref.resolve("3").is_ok());
        let boxed: Box<dyn ProductResolver> = Box::new(catalog);
        assert!(boxed.resolve("3").is_ok());
    }

    #[cfg(feature = "json")]
    #[test]
    fn catalog_from_store_export() {
        use rust_decimal_macros::dec;

        let catalog = ProductCatalog::from_json(
            r#"{
                "22": { "credits": 0, "id": "payg", "period": "month", "photoCut": 0, "totalAmount": 0 },
                "5":  { "credits": 10, "id": "-Lb1", "period": "year", "totalAmount": 12000 },
                "11": { "id": "nonplatform", "period": "", "photoCut": 300 }
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 3);

        let yearly = catalog.resolve("5").unwrap();
        assert_eq!(yearly.period, BillingPeriod::Year);
        assert_eq!(yearly.credits, 10);
        assert_eq!(yearly.total_amount, dec!(12000));

        let single = catalog.resolve("11").unwrap();
        assert!(single.is_single_sale());
        assert_eq!(single.seller_cut, dec!(300));
        assert_eq!(single.period, BillingPeriod::Other(String::new()));

        assert_eq!(catalog.resolve("22").unwrap().channel, SalesChannel::Platform);
    }

    #[cfg(feature = "json")]
    #[test]
    fn catalog_rejects_bad_json() {
        assert!(ProductCatalog::from_json(r#"{"3": {"credits": -1}}"#).is_err());
    }
}
