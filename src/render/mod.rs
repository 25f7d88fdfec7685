//! Report rendering.
//!
//! A [`RenderingSink`] receives the ordered report rows and the batch totals.
//! Two sinks are provided: [`TextTable`] for terminals and logs, and
//! [`CsvTable`] for spreadsheets. Both print the same nine columns and a
//! trailing totals row; amounts use [`MoneyFormat`].
//!
//! # Example
//!
//! ```ignore
//! use afregning::render::*;
//!
//! let mut table = TextTable::new(Vec::new())?.title("Media usage report");
//! table.render(&report.rows, &report.totals)?;
//! let text = String::from_utf8(table.into_inner()).unwrap();
//! ```

mod csv;
mod money;
mod table;

pub use self::csv::CsvTable;
pub use money::MoneyFormat;
pub use table::TextTable;

use thiserror::Error;

use crate::core::{ReportLine, Totals};

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("number format error: {0}")]
    Format(#[from] num_format::Error),
}

/// Consumer of a finished report.
pub trait RenderingSink {
    fn render(&mut self, rows: &[ReportLine], totals: &Totals) -> Result<(), RenderError>;
}

impl<S: RenderingSink + ?Sized> RenderingSink for &mut S {
    fn render(&mut self, rows: &[ReportLine], totals: &Totals) -> Result<(), RenderError> {
        (**self).render(rows, totals)
    }
}

const COLUMNS: usize = 9;

/// Label of the first cell of the totals row.
const TOTALS_LABEL: &str = "Total amounts:";

fn headers(currency: &str) -> [String; COLUMNS] {
    [
        "Inv.#".into(),
        "Date".into(),
        "Customer #".into(),
        "Country".into(),
        "Period".into(),
        "Max seller cut".into(),
        "Min. platform cut".into(),
        "VAT".into(),
        format!("Total price ({currency})"),
    ]
}

fn row_cells(row: &ReportLine, money: &MoneyFormat) -> [String; COLUMNS] {
    [
        row.invoice_number.to_string(),
        row.date.format("%Y-%m-%d").to_string(),
        row.customer.customer_number.to_string(),
        row.recipient.country.clone(),
        row.period.as_str().to_string(),
        money.format(row.seller_cut),
        money.format(row.platform_income),
        money.format(row.vat),
        money.format(row.total()),
    ]
}

fn totals_cells(totals: &Totals, money: &MoneyFormat) -> [String; COLUMNS] {
    [
        TOTALS_LABEL.into(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        money.format(totals.seller_cut),
        money.format(totals.platform_income),
        money.format(totals.vat),
        money.format(totals.total()),
    ]
}

/// Columns holding amounts; right-aligned in text output.
fn is_amount_column(index: usize) -> bool {
    index >= 5
}
