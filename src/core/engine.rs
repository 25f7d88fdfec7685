//! Batch report generation.

use serde::Serialize;

use super::config::{LookupFailurePolicy, ReportConfig};
use super::error::{LookupError, ReportError};
use super::resolver::ProductResolver;
use super::sale::{ReportLine, aggregate_line};
use super::totals::Totals;
use super::types::Invoice;
use super::validation::validate_batch;

/// A line left out of the report because its product could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub invoice_number: u32,
    pub line_number: u32,
    pub product_number: String,
    #[serde(serialize_with = "serialize_display")]
    pub reason: LookupError,
}

/// Rows and totals of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// One row per processed line, in invoice order then line order.
    pub rows: Vec<ReportLine>,
    pub totals: Totals,
    /// Lines dropped under [`LookupFailurePolicy::SkipLine`].
    pub skipped: Vec<SkippedLine>,
}

impl Report {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Runs the per-line computation over a batch of invoices.
///
/// ```
/// use afregning::core::*;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let catalog = ProductCatalog::new().with(ProductBuilder::new("3").credits(10).build());
/// let invoice = InvoiceBuilder::new(150, NaiveDate::from_ymd_opt(2019, 5, 2).unwrap())
///     .recipient("Avisen", "Denmark")
///     .customer(1105)
///     .add_line(LineBuilder::new(1, "3", dec!(1), dec!(1000)).vat(dec!(250)).build())
///     .build()
///     .unwrap();
///
/// let report = ReportEngine::new(catalog).run(&[invoice]).unwrap();
/// assert_eq!(report.totals.seller_cut, dec!(1113.75));
/// ```
pub struct ReportEngine<R> {
    resolver: R,
    config: ReportConfig,
}

impl<R: ProductResolver> ReportEngine<R> {
    /// Engine with the default configuration.
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, ReportConfig::default())
    }

    pub fn with_config(resolver: R, config: ReportConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Produce the report for `invoices`.
    ///
    /// The whole batch is validated first; any malformed record rejects the
    /// batch before a single product lookup. A failed lookup aborts the batch
    /// or skips the line, depending on [`ReportConfig::lookup_failure`].
    pub fn run(&self, invoices: &[Invoice]) -> Result<Report, ReportError> {
        let errors = validate_batch(invoices);
        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), "rejecting malformed batch");
            return Err(ReportError::MalformedInput(errors));
        }

        let mut rows = Vec::new();
        let mut skipped = Vec::new();

        for invoice in invoices {
            for line in &invoice.lines {
                let product = match self.resolver.resolve(line.product_number()) {
                    Ok(product) => product,
                    Err(source) => match self.config.lookup_failure {
                        LookupFailurePolicy::AbortBatch => {
                            tracing::error!(
                                invoice = invoice.number,
                                line = line.line_number,
                                error = %source,
                                "product lookup failed, aborting batch"
                            );
                            return Err(ReportError::Lookup {
                                invoice: invoice.number,
                                line: line.line_number,
                                source,
                            });
                        }
                        LookupFailurePolicy::SkipLine => {
                            tracing::warn!(
                                invoice = invoice.number,
                                line = line.line_number,
                                error = %source,
                                "product lookup failed, skipping line"
                            );
                            skipped.push(SkippedLine {
                                invoice_number: invoice.number,
                                line_number: line.line_number,
                                product_number: line.product_number().to_string(),
                                reason: source,
                            });
                            continue;
                        }
                    },
                };

                rows.push(aggregate_line(invoice, line, &product, &self.config));
            }
        }

        let totals = Totals::from_lines(&rows);
        tracing::info!(
            invoices = invoices.len(),
            rows = rows.len(),
            skipped = skipped.len(),
            net = %totals.net_amount,
            "report generated"
        );

        Ok(Report {
            rows,
            totals,
            skipped,
        })
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}
