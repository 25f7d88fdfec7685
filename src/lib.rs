//! # afregning
//!
//! Billing report engine for a media-licensing platform: turns booked
//! invoices into per-line seller cut, platform income and VAT figures, plus
//! batch totals, ready for the monthly usage report.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Product metadata is looked up through an injected [`ProductResolver`].
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use afregning::core::*;
//! use rust_decimal_macros::dec;
//!
//! let catalog = ProductCatalog::new()
//!     .with(ProductBuilder::new("3").credits(10).build())
//!     .with(ProductBuilder::new("9").single_sale(dec!(300)).build());
//!
//! let invoice = InvoiceBuilder::new(150, NaiveDate::from_ymd_opt(2019, 5, 2).unwrap())
//!     .recipient("Avisen", "Denmark")
//!     .customer(1105)
//!     .add_line(LineBuilder::new(1, "3", dec!(1), dec!(1000)).vat(dec!(250)).build())
//!     .build()
//!     .unwrap();
//!
//! let report = ReportEngine::new(catalog).run(&[invoice]).unwrap();
//! let row = &report.rows[0];
//! assert_eq!(row.seller_cut, dec!(1113.75));
//! assert_eq!(row.platform_income, dec!(0));
//! assert_eq!(row.vat, dec!(250));
//! assert_eq!(report.totals.net_amount, dec!(1000));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Invoice types, cut/tax computation, engine, delivery seams |
//! | `json` | JSON loading of invoices, product catalogs and configuration |
//! | `render` | Text table and CSV report rendering |
//! | `cli` | The `afregning` command-line tool |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod delivery;

#[cfg(feature = "render")]
pub mod render;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
