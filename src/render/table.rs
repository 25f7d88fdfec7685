use std::io::Write;

use chrono::NaiveDate;

use super::{
    COLUMNS, MoneyFormat, RenderError, RenderingSink, headers, is_amount_column, row_cells,
    totals_cells,
};
use crate::core::{ReportLine, Totals};

/// Fixed-width text table.
pub struct TextTable<W> {
    out: W,
    money: MoneyFormat,
    title: Option<String>,
    generated: Option<NaiveDate>,
    currency: String,
}

impl<W: Write> TextTable<W> {
    pub fn new(out: W) -> Result<Self, RenderError> {
        Ok(Self {
            out,
            money: MoneyFormat::danish()?,
            title: None,
            generated: None,
            currency: "DKK".into(),
        })
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Print a "Generated:" line under the title.
    pub fn generated(mut self, date: NaiveDate) -> Self {
        self.generated = Some(date);
        self
    }

    /// Currency named in the total column header.
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn money_format(mut self, money: MoneyFormat) -> Self {
        self.money = money;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_row(
        &mut self,
        cells: &[String; COLUMNS],
        widths: &[usize; COLUMNS],
    ) -> Result<(), RenderError> {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let width = widths[i];
            if is_amount_column(i) {
                line.push_str(&format!("{cell:>width$}"));
            } else {
                line.push_str(&format!("{cell:<width$}"));
            }
        }
        writeln!(self.out, "{}", line.trim_end())?;
        Ok(())
    }
}

impl<W: Write> RenderingSink for TextTable<W> {
    fn render(&mut self, rows: &[ReportLine], totals: &Totals) -> Result<(), RenderError> {
        if let Some(title) = &self.title {
            writeln!(self.out, "{title}")?;
        }
        if let Some(date) = self.generated {
            writeln!(self.out, "Generated: {}", date.format("%a %b %-d, %Y"))?;
        }
        if self.title.is_some() || self.generated.is_some() {
            writeln!(self.out)?;
        }

        let header = headers(&self.currency);
        let body: Vec<_> = rows.iter().map(|r| row_cells(r, &self.money)).collect();
        let footer = totals_cells(totals, &self.money);

        let mut widths = [0usize; COLUMNS];
        for cells in std::iter::once(&header).chain(&body).chain(std::iter::once(&footer)) {
            for (w, cell) in widths.iter_mut().zip(cells) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * (COLUMNS - 1));

        self.write_row(&header, &widths)?;
        writeln!(self.out, "{rule}")?;
        for cells in &body {
            self.write_row(cells, &widths)?;
        }
        writeln!(self.out, "{rule}")?;
        self.write_row(&footer, &widths)?;
        self.out.flush()?;
        Ok(())
    }
}
