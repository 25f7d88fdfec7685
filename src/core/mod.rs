//! Core report types and the per-line computation engine.
//!
//! Booked invoices go in, one [`ReportLine`] per invoice line comes out,
//! together with the batch [`Totals`]. Product metadata is looked up through
//! an injected [`ProductResolver`].

mod builder;
mod config;
mod credits;
mod currency;
mod cut;
mod engine;
mod error;
mod period;
mod resolver;
mod sale;
mod tax;
mod totals;
mod types;
mod validation;

pub use builder::*;
pub use config::*;
pub use credits::{EffectiveProduct, resolve_credits, scale_for_period};
pub use currency::{NormalizedAmounts, normalize, normalize_line};
pub use cut::{Cut, calculate_cut};
pub use engine::*;
pub use error::*;
pub use period::{PeriodLabel, label_period};
pub use resolver::*;
pub use sale::{ReportLine, Sale, aggregate_line};
pub use tax::apply_tax;
pub use totals::Totals;
pub use types::*;
pub use validation::{validate_batch, validate_invoice};
