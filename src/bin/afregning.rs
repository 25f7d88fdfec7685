use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use afregning::core::{
    CachingResolver, Invoice, LookupFailurePolicy, ProductCatalog, Report, ReportConfig,
    ReportEngine,
};
use afregning::delivery::{DateRange, DirectoryUpload, LogNotifier, deliver};
use afregning::render::{CsvTable, RenderingSink, TextTable};
use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "afregning")]
#[command(about = "Media-usage billing report: seller cut, platform income and VAT per invoice line")]
struct Cli {
    /// Booked invoices as JSON (array or API page).
    #[arg(long, env = "AFREGNING_INVOICES")]
    invoices: PathBuf,

    /// Subscription products as JSON, keyed by product number.
    #[arg(long, env = "AFREGNING_PRODUCTS")]
    products: PathBuf,

    /// Report configuration as JSON. Defaults apply when omitted.
    #[arg(long, env = "AFREGNING_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// First invoice date to include. Needs --to.
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Last invoice date to include. Needs --from.
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Only include invoices from the previous calendar month.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    previous_month: bool,

    /// Leave out lines whose product cannot be found instead of failing.
    #[arg(long)]
    skip_missing: bool,

    /// Store the report below this directory and announce it in the log
    /// instead of printing it.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Csv,
}

impl Format {
    fn file_name(self) -> &'static str {
        match self {
            Self::Text => "report.txt",
            Self::Csv => "report.csv",
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_config(cli: &Cli) -> anyhow::Result<ReportConfig> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_json(&read(path)?)
            .with_context(|| format!("parsing {}", path.display()))?,
        None => ReportConfig::default(),
    };
    if cli.skip_missing {
        config.lookup_failure = LookupFailurePolicy::SkipLine;
    }
    Ok(config)
}

fn date_range(cli: &Cli) -> anyhow::Result<Option<DateRange>> {
    if cli.previous_month {
        let today = Local::now().date_naive();
        return DateRange::previous_month(today)
            .map(Some)
            .context("no previous month for today's date");
    }
    match (cli.from, cli.to) {
        (Some(from), Some(to)) => match DateRange::new(from, to) {
            Some(range) => Ok(Some(range)),
            None => bail!("--from {from} is after --to {to}"),
        },
        _ => Ok(None),
    }
}

fn render(
    report: &Report,
    format: Format,
    currency: &str,
    range: Option<&DateRange>,
) -> anyhow::Result<Vec<u8>> {
    let out = match format {
        Format::Text => {
            let title = match range {
                Some(range) => format!("Media usage report {range}"),
                None => "Media usage report".to_string(),
            };
            let mut table = TextTable::new(Vec::new())?
                .title(title)
                .generated(Local::now().date_naive())
                .currency(currency);
            table.render(&report.rows, &report.totals)?;
            table.into_inner()
        }
        Format::Csv => {
            let mut csv = CsvTable::new(Vec::new())?.currency(currency);
            csv.render(&report.rows, &report.totals)?;
            csv.into_inner()
        }
    };
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = load_config(&cli)?;
    let catalog = ProductCatalog::from_json(&read(&cli.products)?)
        .with_context(|| format!("parsing {}", cli.products.display()))?;
    let mut invoices = Invoice::list_from_json(&read(&cli.invoices)?)
        .with_context(|| format!("parsing {}", cli.invoices.display()))?;

    let range = date_range(&cli)?;
    if let Some(range) = &range {
        invoices = range.select(&invoices);
        tracing::info!(range = %range, invoices = invoices.len(), "selected invoices");
    }

    let currency = config.reporting_currency.clone();
    let engine = ReportEngine::with_config(CachingResolver::new(catalog), config);
    let report = engine.run(&invoices).context("generating report")?;
    for skipped in &report.skipped {
        tracing::warn!(
            invoice = skipped.invoice_number,
            line = skipped.line_number,
            product = %skipped.product_number,
            "line left out of report"
        );
    }

    let artifact = render(&report, cli.format, &currency, range.as_ref())?;

    match &cli.out_dir {
        Some(dir) => {
            let Some(range) = range else {
                bail!("--out-dir needs --previous-month or --from/--to");
            };
            let mut upload = DirectoryUpload::new(dir, cli.format.file_name());
            let outcome = deliver(&artifact, &range, &mut upload, &mut LogNotifier);
            match &outcome.location {
                Some(location) => println!("{location}"),
                // The report is still printed when it could not be stored.
                None => io::stdout().write_all(&artifact)?,
            }
        }
        None => io::stdout().write_all(&artifact)?,
    }
    Ok(())
}
