use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tygia::bank::BankClients;
use tygia::catalog::{CurrencyCatalog, Selection};
use tygia::config::Config;
use tygia::date_range::{DateRange, parse_iso_date};
use tygia::display::render_table;
use tygia::driver::{NO_DATA_MESSAGE, RangeFetcher};
use tygia::export::{ExportFormat, write_export};
use tygia::http::{HttpFetch, ReqwestFetcher};
use tygia::model::Bank;
use tygia::proxy::ProxyFetcher;
use tygia::server::{self, AppState};

#[derive(Parser)]
#[command(name = "tygia", about = "Vietnamese bank exchange rate exporter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Fetch rates for a date range and print or export them
    Fetch {
        #[arg(long, value_enum)]
        bank: BankArg,
        /// Defaults to the bank's first catalog entry
        #[arg(long)]
        currency: Option<String>,
        /// YYYY-MM-DD, defaults to a week before the end date
        #[arg(long)]
        start: Option<String>,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List the currencies a bank publishes
    Currencies {
        #[arg(long, value_enum)]
        bank: BankArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BankArg {
    Techcombank,
    Bidv,
}

impl From<BankArg> for Bank {
    fn from(arg: BankArg) -> Self {
        match arg {
            BankArg::Techcombank => Bank::Techcombank,
            BankArg::Bidv => Bank::Bidv,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Xlsx,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let cfg = Config::from_env()?;

    match cli.command {
        Command::Serve => {
            let state = AppState {
                clients: build_clients(&cfg)?,
                date_delay: cfg.date_delay,
            };
            server::run(&cfg.server_address, state).await?;
        }
        Command::Fetch {
            bank,
            currency,
            start,
            end,
            format,
        } => {
            let selection = Selection::with_currency(bank.into(), currency.as_deref())?;
            let range = resolve_range(start.as_deref(), end.as_deref(), Utc::now().date_naive())?;
            fetch(&cfg, &selection, range, format).await?;
        }
        Command::Currencies { bank } => {
            for currency in CurrencyCatalog::currencies(bank.into()) {
                println!("{:<16}{}", currency.value, currency.label);
            }
        }
    }

    Ok(())
}

fn build_clients(cfg: &Config) -> Result<BankClients> {
    let http: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(cfg.request_timeout)?);
    let proxy = ProxyFetcher::new(http.clone())
        .with_rounds(cfg.proxy_rounds)
        .with_backoff(cfg.proxy_backoff);

    Ok(BankClients::new(http, proxy))
}

fn resolve_range(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<DateRange> {
    let end = end.map(parse_iso_date).transpose()?.unwrap_or(today);
    let range = match start {
        Some(start) => DateRange::new(parse_iso_date(start)?, end)?,
        None => DateRange::last_week(end),
    };
    Ok(range)
}

async fn fetch(cfg: &Config, selection: &Selection, range: DateRange, format: OutputFormat) -> Result<()> {
    let clients = build_clients(cfg)?;
    let batch = RangeFetcher::new(clients.adapter(selection.bank()))
        .with_delay(cfg.date_delay)
        .fetch_range(range, selection.currency())
        .await?;

    if batch.is_empty() {
        println!("{}", NO_DATA_MESSAGE);
        return Ok(());
    }

    let export = match format {
        OutputFormat::Table => {
            print!("{}", render_table(&batch.rows));
            return Ok(());
        }
        OutputFormat::Csv => ExportFormat::Csv,
        OutputFormat::Xlsx => ExportFormat::Xlsx,
    };
    let path = write_export(&batch, export, &cfg.output_dir)?;
    println!("{}", path.display());

    Ok(())
}
