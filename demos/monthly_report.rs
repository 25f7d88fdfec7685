use afregning::core::*;
use afregning::delivery::DateRange;
use afregning::render::{CsvTable, RenderingSink, TextTable};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 5, d).unwrap()
}

fn main() {
    let catalog = ProductCatalog::new()
        .with(ProductBuilder::new("3").credits(10).build())
        .with(ProductBuilder::new("7").credits(5).period("year").build())
        .with(ProductBuilder::new("22").build())
        .with(ProductBuilder::new("5").build())
        .with(ProductBuilder::new("11").single_sale(dec!(300)).build());

    let invoices = vec![
        InvoiceBuilder::new(150, date(2))
            .recipient("Avisen", "Denmark")
            .customer(1105)
            .add_line(LineBuilder::new(1, "3", dec!(1), dec!(1000)).vat(dec!(250)).build())
            .add_line(LineBuilder::new(2, "22", dec!(5), dec!(500)).vat(dec!(125)).build())
            .build()
            .expect("invoice 150 should be valid"),
        InvoiceBuilder::new(151, date(3))
            .recipient("Ugeavisen", "Danmark")
            .customer(1107)
            .add_line(LineBuilder::new(1, "5", dec!(1), dec!(2000)).vat(dec!(500)).build())
            .build()
            .expect("invoice 151 should be valid"),
        InvoiceBuilder::new(152, date(14))
            .recipient("Zeitung", "Germany")
            .customer(2001)
            .currency("EUR")
            .add_line(LineBuilder::new(1, "7", dec!(1), dec!(100)).vat(dec!(20)).build())
            .build()
            .expect("invoice 152 should be valid"),
        InvoiceBuilder::new(153, date(28))
            .recipient("Bureau", "Sweden")
            .customer(3050)
            .add_line(LineBuilder::new(1, "11", dec!(1), dec!(1000)).vat(dec!(200)).build())
            .build()
            .expect("invoice 153 should be valid"),
    ];

    let range = DateRange::previous_month(NaiveDate::from_ymd_opt(2019, 6, 1).unwrap())
        .expect("May 2019 exists");
    let batch = range.select(&invoices);

    let report = ReportEngine::new(CachingResolver::new(catalog))
        .run(&batch)
        .expect("report should succeed");

    let mut table = TextTable::new(std::io::stdout())
        .expect("Danish money format")
        .title(format!("Media usage report {range}"));
    table.render(&report.rows, &report.totals).expect("write table");

    println!();
    let mut csv = CsvTable::new(std::io::stdout()).expect("Danish money format");
    csv.render(&report.rows, &report.totals).expect("write CSV");
}
