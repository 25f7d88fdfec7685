//! Property-based tests for the report engine.
//!
//! Run with: `cargo test --test proptest_tests`

use afregning::core::*;
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const PRODUCTS: [&str; 7] = ["2", "3", "5", "7", "11", "22", "25"];
const COUNTRIES: [&str; 4] = ["Denmark", "Danmark", "Sweden", "Germany"];
const CURRENCIES: [&str; 3] = ["DKK", "EUR", "SEK"];

fn catalog() -> ProductCatalog {
    ProductCatalog::new()
        .with(ProductBuilder::new("2").credits(2).build())
        .with(ProductBuilder::new("3").credits(10).build())
        .with(ProductBuilder::new("5").build())
        .with(ProductBuilder::new("7").credits(5).period("year").build())
        .with(ProductBuilder::new("11").single_sale(dec!(300)).build())
        .with(ProductBuilder::new("22").credits(40).period("year").build())
        .with(ProductBuilder::new("25").build())
}

// ── Strategies ─────────────────────────────────────────────────────────────

/// Non-negative amount with two decimals, up to 99 999.99.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Non-negative quantity with one decimal, up to 999.9.
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (0u32..10_000u32).prop_map(|tenths| Decimal::new(i64::from(tenths), 1))
}

fn arb_line(line_number: u32) -> impl Strategy<Value = Line> {
    (
        prop::sample::select(PRODUCTS.to_vec()),
        arb_quantity(),
        arb_amount(),
        arb_amount(),
    )
        .prop_map(move |(product, quantity, net, vat)| {
            LineBuilder::new(line_number, product, quantity, net)
                .vat(vat)
                .build()
        })
}

fn arb_invoice() -> impl Strategy<Value = Invoice> {
    (
        1u32..100_000,
        prop::sample::select(COUNTRIES.to_vec()),
        prop::sample::select(CURRENCIES.to_vec()),
        prop::collection::vec(arb_line(1), 0..6),
    )
        .prop_map(|(number, country, currency, lines)| {
            let date = NaiveDate::from_ymd_opt(2019, 5, 14).unwrap();
            let mut builder = InvoiceBuilder::new(number, date)
                .recipient("Avisen", country)
                .customer(1105)
                .currency(currency);
            for (i, mut line) in lines.into_iter().enumerate() {
                line.line_number = i as u32 + 1;
                builder = builder.add_line(line);
            }
            builder.build().unwrap()
        })
}

fn arb_batch() -> impl Strategy<Value = Vec<Invoice>> {
    prop::collection::vec(arb_invoice(), 0..12)
}

// ── Properties ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn platform_income_never_negative(batch in arb_batch()) {
        let report = ReportEngine::new(catalog()).run(&batch).unwrap();
        for row in &report.rows {
            prop_assert!(row.platform_income >= Decimal::ZERO, "row {:?}", row);
        }
        prop_assert!(report.totals.platform_income >= Decimal::ZERO);
    }

    #[test]
    fn totals_equal_sum_of_rows(batch in arb_batch()) {
        let report = ReportEngine::new(catalog()).run(&batch).unwrap();
        let seller: Decimal = report.rows.iter().map(|r| r.seller_cut).sum();
        let income: Decimal = report.rows.iter().map(|r| r.platform_income).sum();
        let vat: Decimal = report.rows.iter().map(|r| r.vat).sum();
        let net: Decimal = report.rows.iter().map(|r| r.net_amount).sum();
        prop_assert_eq!(report.totals.seller_cut, seller);
        prop_assert_eq!(report.totals.platform_income, income);
        prop_assert_eq!(report.totals.vat, vat);
        prop_assert_eq!(report.totals.net_amount, net);
    }

    #[test]
    fn one_row_per_line_in_order(batch in arb_batch()) {
        let report = ReportEngine::new(catalog()).run(&batch).unwrap();
        let expected: Vec<_> = batch
            .iter()
            .flat_map(|inv| inv.lines.iter().map(move |l| (inv.number, l.line_number)))
            .collect();
        let actual: Vec<_> = report
            .rows
            .iter()
            .map(|r| (r.invoice_number, r.line_number))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn platform_vat_only_for_domestic_recipients(batch in arb_batch()) {
        let config = ReportConfig::default();
        let report = ReportEngine::new(catalog()).run(&batch).unwrap();
        for row in &report.rows {
            if row.period != PeriodLabel::OneTime && !config.is_domestic(&row.recipient.country) {
                prop_assert_eq!(row.vat, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn single_sale_vat_is_invoice_vat(inv in arb_invoice()) {
        let report = ReportEngine::new(catalog()).run(std::slice::from_ref(&inv)).unwrap();
        for row in report.rows.iter().filter(|r| r.period == PeriodLabel::OneTime) {
            prop_assert_eq!(row.vat, inv.vat_amount);
            prop_assert_eq!(row.net_amount, inv.net_amount);
        }
    }

    #[test]
    fn payg_credits_follow_quantity(quantity in arb_quantity(), configured in 0u32..1000) {
        let config = ReportConfig::default();
        let product = ProductBuilder::new("22").credits(configured).build();
        let line = LineBuilder::new(1, "22", quantity, dec!(100)).build();
        let effective = resolve_credits(&line, &product, &config);
        prop_assert_eq!(Decimal::from(effective.credits), quantity.trunc());
    }

    #[test]
    fn yearly_credits_scaled_by_twelve(quantity in arb_quantity(), configured in 0u32..1000) {
        let config = ReportConfig::default();

        let yearly = ProductBuilder::new("7").credits(configured).period("year").build();
        let line = LineBuilder::new(1, "7", quantity, dec!(100)).build();
        prop_assert_eq!(resolve_credits(&line, &yearly, &config).credits, configured * 12);

        let payg = ProductBuilder::new("22").credits(configured).period("year").build();
        let line = LineBuilder::new(1, "22", quantity, dec!(100)).build();
        let base = quantity.trunc();
        prop_assert_eq!(
            Decimal::from(resolve_credits(&line, &payg, &config).credits),
            base * dec!(12)
        );
    }

    #[test]
    fn euro_amounts_converted_exactly(net in arb_amount(), vat in arb_amount()) {
        let config = ReportConfig::default();
        let eur = normalize(net, vat, "EUR", &config);
        prop_assert_eq!(eur.net, net * EUR_TO_DKK);
        prop_assert_eq!(eur.vat, vat * EUR_TO_DKK);

        let dkk = normalize(net, vat, "DKK", &config);
        prop_assert_eq!(dkk, NormalizedAmounts { net, vat });
    }

    #[test]
    fn period_label_from_billing_period(
        period in prop::sample::select(vec!["month", "year", "week", "", "Month"]),
    ) {
        let label = label_period(&BillingPeriod::from(period));
        let expected = match period {
            "month" => "MONTH",
            "year" => "YEAR",
            _ => "%",
        };
        prop_assert_eq!(label.as_str(), expected);
    }

    #[test]
    fn caching_never_changes_the_report(batch in arb_batch()) {
        let plain = ReportEngine::new(catalog()).run(&batch).unwrap();
        let cached = ReportEngine::new(CachingResolver::new(catalog())).run(&batch).unwrap();
        prop_assert_eq!(plain, cached);
    }
}
