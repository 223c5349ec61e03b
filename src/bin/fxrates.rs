//! fxrates CLI - query the rate archive and compute analytics
//!
//! ## Example Usage
//!
//! ```bash
//! # Rates for one date, re-based to USD
//! fxrates --archive eurofxref-hist.csv rates 2024-01-02 --base USD --symbols GBP,JPY
//!
//! # Financial metrics over a year
//! fxrates --archive rates.json metrics --start 2023-01-01 --end 2023-12-31 --symbols USD,GBP
//!
//! # Sliding 30-trading-day windows
//! fxrates --archive rates.json rolling --start 2023-01-01 --end 2023-06-30 --window 30
//!
//! # Archive summary
//! fxrates --archive rates.json info
//! ```

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rusty_fxrates::config::AnalyticsConfig;
use rusty_fxrates::data::{InMemoryRateArchive, RateArchive, SymbolFilter};
use rusty_fxrates::service::RateService;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

/// fxrates: historical exchange rates and currency analytics
#[derive(Parser)]
#[command(name = "fxrates")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Historical exchange rates and currency analytics", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Rate archive (.json or ECB-style .csv)
    #[arg(short, long, global = true)]
    archive: Option<PathBuf>,

    /// Analytics configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Quote {
    /// Base currency
    #[arg(short, long, default_value = "EUR")]
    base: String,

    /// Comma separated currency codes (default: all)
    #[arg(short, long, default_value = "")]
    symbols: String,
}

impl Quote {
    fn filter(&self) -> SymbolFilter {
        SymbolFilter::parse(&self.symbols)
    }
}

#[derive(Args)]
struct Range {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,
}

#[derive(Subcommand)]
enum Commands {
    /// Rates for a single date
    Rates {
        /// Date (YYYY-MM-DD)
        #[arg(value_name = "DATE")]
        date: NaiveDate,

        #[command(flatten)]
        quote: Quote,
    },

    /// Rates on the most recent archived date
    Latest {
        #[command(flatten)]
        quote: Quote,
    },

    /// Rates for every archived date in a range
    Timeseries {
        #[command(flatten)]
        quote: Quote,

        #[command(flatten)]
        range: Range,
    },

    /// First-to-last change per currency over a range
    Fluctuation {
        #[command(flatten)]
        quote: Quote,

        #[command(flatten)]
        range: Range,
    },

    /// Statistics over sliding windows of trading dates
    Rolling {
        #[command(flatten)]
        quote: Quote,

        #[command(flatten)]
        range: Range,

        /// Window size in trading dates
        #[arg(short, long, default_value = "30")]
        window: usize,
    },

    /// Returns, volatility, risk, momentum and correlation per currency
    Metrics {
        #[command(flatten)]
        quote: Quote,

        #[command(flatten)]
        range: Range,

        /// Override the configured annual risk-free rate (decimal)
        #[arg(long)]
        risk_free_rate: Option<f64>,
    },

    /// Summarise the archive and active configuration
    Info,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rusty_fxrates").join("config.toml"))
}

fn load_config(explicit: Option<&Path>) -> Result<AnalyticsConfig, Box<dyn std::error::Error>> {
    if let Some(path) = explicit {
        return Ok(AnalyticsConfig::from_file(path)?);
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            log::info!("Using configuration from {}", path.display());
            Ok(AnalyticsConfig::from_file(&path)?)
        }
        _ => Ok(AnalyticsConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct DatedRates<'a> {
    base: &'a str,
    date: NaiveDate,
    rates: rusty_fxrates::types::RateMap,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    let mut config = load_config(cli.config.as_deref())?;
    if let Commands::Metrics {
        risk_free_rate: Some(rate),
        ..
    } = cli.command
    {
        config = config.with_risk_free_rate(rate);
        config.validate()?;
    }

    let archive_path = cli
        .archive
        .ok_or("no rate archive given (use --archive <path>)")?;

    let started = Instant::now();
    let archive = InMemoryRateArchive::from_path(&archive_path)?;
    log::info!(
        "Loaded {} dates from {} in {:.2?}",
        archive.num_days(),
        archive_path.display(),
        started.elapsed()
    );

    if let Commands::Info = cli.command {
        return show_info(&archive, &archive_path, &config);
    }

    let service = RateService::with_config(Arc::new(archive), config);

    match cli.command {
        Commands::Rates { date, quote } => {
            let rates = service.historical_rates(date, &quote.base, &quote.filter())?;
            print_json(&DatedRates {
                base: &quote.base.to_ascii_uppercase(),
                date,
                rates,
            })
        }

        Commands::Latest { quote } => {
            let (date, rates) = service.latest_rates(&quote.base, &quote.filter())?;
            print_json(&DatedRates {
                base: &quote.base.to_ascii_uppercase(),
                date,
                rates,
            })
        }

        Commands::Timeseries { quote, range } => print_json(&service.timeseries(
            &quote.base,
            &quote.filter(),
            range.start,
            range.end,
        )?),

        Commands::Fluctuation { quote, range } => print_json(&service.fluctuation(
            &quote.base,
            &quote.filter(),
            range.start,
            range.end,
        )?),

        Commands::Rolling {
            quote,
            range,
            window,
        } => print_json(&service.rolling_metrics(
            &quote.base,
            &quote.filter(),
            range.start,
            range.end,
            window,
        )?),

        Commands::Metrics { quote, range, .. } => print_json(&service.financial_metrics(
            &quote.base,
            &quote.filter(),
            range.start,
            range.end,
        )?),

        Commands::Info => Ok(()),
    }
}

fn show_info(archive: &InMemoryRateArchive, path: &Path, config: &AnalyticsConfig) -> CliResult {
    println!(
        "{} {}",
        "fxrates".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();

    println!("{}", "Archive".bold());
    println!("{}", "=======".dimmed());
    println!("  {} {}", "Path:".bold(), path.display());
    match archive.date_range() {
        Some((first, last)) => {
            println!("  {} {} to {}", "Coverage:".bold(), first, last);
        }
        None => println!("  {} {}", "Coverage:".bold(), "empty".red()),
    }
    println!("  {} {}", "Trading dates:".bold(), archive.num_days());
    println!("  {} {}", "Rate entries:".bold(), archive.num_entries());
    let currencies = archive.currencies();
    println!(
        "  {} {} ({})",
        "Currencies:".bold(),
        currencies.len(),
        currencies.join(", ").dimmed()
    );
    println!();

    println!("{}", "Analytics".bold());
    println!("{}", "=========".dimmed());
    println!(
        "  {} {:.2}%",
        "Risk-free rate:".bold(),
        config.risk_free_rate * 100.0
    );
    println!(
        "  {} {}",
        "Trading days/year:".bold(),
        config.trading_days_per_year
    );
    println!(
        "  {} {:?}",
        "Rolling windows:".bold(),
        config.rolling_windows
    );
    println!(
        "  {} {} returns",
        "VaR minimum sample:".bold(),
        config.var_min_sample
    );
    if let Some(path) = default_config_path() {
        let status = if path.exists() {
            "found".green()
        } else {
            "not found".dimmed()
        };
        println!(
            "  {} {} ({})",
            "Config file:".bold(),
            path.display(),
            status
        );
    }
    println!();

    Ok(())
}
