use std::io::Write;

use super::{MoneyFormat, RenderError, RenderingSink, headers, row_cells, totals_cells};
use crate::core::{ReportLine, Totals};

/// Semicolon-separated CSV with a header line and a trailing totals line.
///
/// Every field is quoted, since amounts contain `,` and `.`. Lines end with
/// CRLF.
pub struct CsvTable<W> {
    out: W,
    money: MoneyFormat,
    currency: String,
}

impl<W: Write> CsvTable<W> {
    pub fn new(out: W) -> Result<Self, RenderError> {
        Ok(Self {
            out,
            money: MoneyFormat::danish()?,
            currency: "DKK".into(),
        })
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_record(&mut self, cells: &[String]) -> Result<(), RenderError> {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push(';');
            }
            csv_field(&mut line, cell);
        }
        line.push_str("\r\n");
        self.out.write_all(line.as_bytes())?;
        Ok(())
    }
}

impl<W: Write> RenderingSink for CsvTable<W> {
    fn render(&mut self, rows: &[ReportLine], totals: &Totals) -> Result<(), RenderError> {
        let header = headers(&self.currency);
        self.write_record(&header)?;
        for row in rows {
            let cells = row_cells(row, &self.money);
            self.write_record(&cells)?;
        }
        let footer = totals_cells(totals, &self.money);
        self.write_record(&footer)?;
        self.out.flush()?;
        Ok(())
    }
}

fn csv_field(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_are_doubled() {
        let mut s = String::new();
        csv_field(&mut s, r#"Bladet "Nord""#);
        assert_eq!(s, r#""Bladet ""Nord""""#);
    }

    #[test]
    fn empty_report() {
        let mut csv = CsvTable::new(Vec::new()).unwrap().currency("EUR");
        csv.render(&[], &Totals::default()).unwrap();
        let text = String::from_utf8(csv.into_inner()).unwrap();
        assert_eq!(
            text,
            "\"Inv.#\";\"Date\";\"Customer #\";\"Country\";\"Period\";\"Max seller cut\";\
             \"Min. platform cut\";\"VAT\";\"Total price (EUR)\"\r\n\
             \"Total amounts:\";\"\";\"\";\"\";\"\";\"0,00\";\"0,00\";\"0,00\";\"0,00\"\r\n"
        );
    }
}
