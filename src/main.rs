use analytics::{AnalyticsError, ReturnStatisticsEngine};
use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use configuration::Config;
use core_types::{Period, PriceSeries};
use market_data::{CsvPriceSource, PriceSource};
use std::path::PathBuf;

mod display;

/// The main entry point for the index return analysis tool.
fn main() {
    // Optional: a .env file may carry INSIGHT_* overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match configuration::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(2);
        }
    };

    let _log_guard = match configuration::init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Refresh(args) => handle_refresh(args, &config),
        Commands::Returns(args) => handle_returns(args, &config),
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Historical index returns and what tended to follow a below-average year.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (default: ./config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute annual returns, current-year monthly returns and the
    /// below-average statistics.
    Refresh(RefreshArgs),
    /// Print the returns of a single granularity.
    Returns(ReturnsArgs),
}

/// Overrides for the `[market]` configuration section.
#[derive(Args, Debug, Clone)]
struct MarketArgs {
    /// The symbol to analyse (e.g., "^NSEI").
    #[arg(long)]
    symbol: Option<String>,

    /// The start date of the history (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// The end date of the history (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Directory holding `<symbol>.csv` price files.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Args)]
struct RefreshArgs {
    #[command(flatten)]
    market: MarketArgs,

    /// Print the result as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ReturnsArgs {
    #[command(flatten)]
    market: MarketArgs,

    /// The granularity to resample to: yearly or monthly.
    #[arg(long, default_value = "yearly")]
    period: Period,
}

/// The resolved request after applying CLI overrides to the configuration.
#[derive(Debug, Clone, PartialEq)]
struct MarketRequest {
    symbol: String,
    from: NaiveDate,
    to: NaiveDate,
    data_dir: PathBuf,
}

impl MarketRequest {
    fn resolve(args: MarketArgs, config: &Config, today: NaiveDate) -> anyhow::Result<Self> {
        let request = Self {
            symbol: args.symbol.unwrap_or_else(|| config.market.symbol.clone()),
            from: args.from.unwrap_or(config.market.start_date),
            to: args.to.or(config.market.end_date).unwrap_or(today),
            data_dir: args.data_dir.unwrap_or_else(|| config.market.data_dir.clone()),
        };
        anyhow::ensure!(
            request.from <= request.to,
            "start date {} is after end date {}",
            request.from,
            request.to
        );
        Ok(request)
    }

    /// January 1 of the year the history ends in.
    fn current_year_start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.to.year(), 1, 1).unwrap_or(self.to)
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn load_history(source: &impl PriceSource, request: &MarketRequest) -> anyhow::Result<PriceSeries> {
    source
        .fetch(&request.symbol, request.from, request.to)
        .with_context(|| format!("failed to load prices for {}", request.symbol))
}

/// Handles one on-demand refresh: fetch, compute, render.
fn handle_refresh(args: RefreshArgs, config: &Config) -> anyhow::Result<()> {
    let request = MarketRequest::resolve(args.market, config, Local::now().date_naive())?;
    tracing::info!(
        symbol = %request.symbol,
        from = %request.from,
        to = %request.to,
        "Starting refresh."
    );

    let source = CsvPriceSource::new(&request.data_dir);
    let history = load_history(&source, &request)?;
    let current_year = history.since(request.current_year_start());

    let engine = ReturnStatisticsEngine::new();
    let snapshot = match engine.refresh(&history, &current_year) {
        Ok(snapshot) => snapshot,
        Err(e @ AnalyticsError::EmptyInput(_)) => {
            println!("{}", display::render_load_error(&request.symbol, &e.to_string()));
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", display::render_snapshot(&request.symbol, &snapshot));
    }

    Ok(())
}

/// Prints a single resampled return series.
fn handle_returns(args: ReturnsArgs, config: &Config) -> anyhow::Result<()> {
    let request = MarketRequest::resolve(args.market, config, Local::now().date_naive())?;

    let source = CsvPriceSource::new(&request.data_dir);
    let history = load_history(&source, &request)?;

    let engine = ReturnStatisticsEngine::new();
    let returns = engine.resample_to_period_returns(&history, args.period)?;

    let heading = match args.period {
        Period::Yearly => "Year",
        Period::Monthly => "Month",
    };
    println!("{}", display::returns_table(&returns, heading));
    if let Some(mean) = returns.mean()? {
        println!("Average {} return: {}", args.period, display::percent(mean));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::{Logging, Market};
    use core_types::PricePoint;
    use market_data::InMemoryPriceSource;

    fn config() -> Config {
        Config {
            market: Market {
                symbol: "^NSEI".to_string(),
                start_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                end_date: None,
                data_dir: PathBuf::from("data"),
            },
            logging: Logging {
                level: "info".to_string(),
                directory: None,
            },
        }
    }

    fn no_overrides() -> MarketArgs {
        MarketArgs {
            symbol: None,
            from: None,
            to: None,
            data_dir: None,
        }
    }

    #[test]
    fn request_falls_back_to_config_and_today() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let request = MarketRequest::resolve(no_overrides(), &config(), today).unwrap();

        assert_eq!(request.symbol, "^NSEI");
        assert_eq!(request.to, today);
        assert_eq!(request.current_year_start(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn cli_overrides_win() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let args = MarketArgs {
            symbol: Some("^GSPC".to_string()),
            to: NaiveDate::from_ymd_opt(2019, 6, 30),
            ..no_overrides()
        };

        let request = MarketRequest::resolve(args, &config(), today).unwrap();

        assert_eq!(request.symbol, "^GSPC");
        assert_eq!(request.current_year_start(), NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let today = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        assert!(MarketRequest::resolve(no_overrides(), &config(), today).is_err());
    }

    #[test]
    fn cli_parses_refresh_and_returns() {
        let cli = Cli::try_parse_from(["index-insight", "refresh", "--symbol", "^NSEI", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Refresh(RefreshArgs { json: true, .. })));

        let cli = Cli::try_parse_from(["index-insight", "returns", "--period", "monthly"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Returns(ReturnsArgs { period: Period::Monthly, .. })
        ));
    }

    #[test]
    fn history_flows_through_refresh() {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let series = PriceSeries::new(vec![
            PricePoint::new(day(2022, 12, 30), 100.into()),
            PricePoint::new(day(2023, 12, 29), 120.into()),
            PricePoint::new(day(2024, 1, 31), 126.into()),
            PricePoint::new(day(2024, 2, 29), 132.into()),
        ])
        .unwrap();
        let args = MarketArgs {
            to: Some(day(2024, 3, 1)),
            ..no_overrides()
        };
        let request = MarketRequest::resolve(args, &config(), day(2024, 3, 1)).unwrap();

        let history = load_history(&InMemoryPriceSource::new(series), &request).unwrap();
        let snapshot = ReturnStatisticsEngine::new()
            .refresh(&history, &history.since(request.current_year_start()))
            .unwrap();

        assert_eq!(snapshot.annual_returns.len(), 2);
        assert_eq!(snapshot.monthly_returns.len(), 1);
        let rendered = display::render_snapshot(&request.symbol, &snapshot);
        assert!(rendered.contains("Probability analysis"));
        assert!(rendered.contains("20.00%"));
    }
}
