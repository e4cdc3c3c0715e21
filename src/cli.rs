//! CLI definition and dispatch.
//!
//! Every subcommand renders its result to a string; [`run`] prints it to
//! stdout and turns errors into a message on stderr plus an exit code.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::cached_data_adapter::CachedDataAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReport;
use crate::adapters::static_ticker_feed::StaticTickerFeed;
use crate::adapters::text_report::TextReport;
use crate::domain::backtest::BacktestEngine;
use crate::domain::bar::BarSeries;
use crate::domain::config_validation::{Settings, is_valid_ticker, load_settings};
use crate::domain::error::StratbenchError;
use crate::domain::evaluator::StrategyEvaluator;
use crate::domain::planner::plan_trade;
use crate::domain::recommendation::recommend;
use crate::domain::strategy::{StrategyId, StrategyRegistry};
use crate::domain::summary::generate_summary;
use crate::domain::technical::IndicatorSnapshot;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use crate::ports::ticker_feed_port::TickerFeed;

#[derive(Parser, Debug)]
#[command(name = "stratbench", about = "Backtest and rank trading strategies")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest a single strategy on one ticker
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        strategy: String,
        /// Lookback window in calendar days
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Rank every enabled strategy on one ticker
    Rank {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        ticker: String,
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Best strategy per ticker across the configured feeds
    Summary {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated tickers, overriding [summary] tickers
        #[arg(long)]
        tickers: Option<String>,
        #[arg(long)]
        top_n: Option<usize>,
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Pick a strategy for the ticker's current pattern and show its decision
    Plan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        ticker: String,
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Indicator snapshot, composite signal and optional trade recommendation
    Indicators {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        ticker: String,
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        entry_price: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the built-in strategies
    Strategies,
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli.command) {
        Ok(output) => {
            println!("{}", output.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Run one subcommand and return its rendered output.
pub fn execute(command: Command) -> Result<String, StratbenchError> {
    match command {
        Command::Backtest {
            config,
            ticker,
            strategy,
            days,
            json,
        } => run_backtest(config.as_deref(), &ticker, &strategy, days, reporter(json).as_ref()),
        Command::Rank {
            config,
            ticker,
            days,
            json,
        } => run_rank(config.as_deref(), &ticker, days, reporter(json).as_ref()),
        Command::Summary {
            config,
            tickers,
            top_n,
            days,
            json,
        } => run_summary(
            config.as_deref(),
            tickers.as_deref(),
            top_n,
            days,
            reporter(json).as_ref(),
        ),
        Command::Plan {
            config,
            ticker,
            days,
            json,
        } => run_plan(config.as_deref(), &ticker, days, reporter(json).as_ref()),
        Command::Indicators {
            config,
            ticker,
            days,
            entry_price,
            json,
        } => run_indicators(
            config.as_deref(),
            &ticker,
            days,
            entry_price,
            reporter(json).as_ref(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Strategies => Ok(list_strategies()),
    }
}

fn reporter(json: bool) -> Box<dyn ReportPort> {
    if json {
        Box::new(JsonReport)
    } else {
        Box::new(TextReport)
    }
}

/// Settings from the INI file at `path`, or all defaults without one.
pub fn load_settings_from(path: Option<&Path>) -> Result<Settings, StratbenchError> {
    let config = match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path)?
        }
        None => FileConfigAdapter::empty(),
    };
    load_settings(&config)
}

pub fn build_data_port(settings: &Settings) -> CachedDataAdapter<CsvAdapter> {
    CachedDataAdapter::new(CsvAdapter::new(settings.csv_dir.clone()), settings.cache_ttl_secs)
}

fn build_evaluator<'a>(
    data: &'a dyn DataPort,
    settings: &Settings,
    registry: StrategyRegistry,
) -> StrategyEvaluator<'a> {
    StrategyEvaluator::new(data, registry, BacktestEngine::new(settings.backtest.clone()))
        .with_min_bars(settings.min_bars)
}

fn normalize_ticker(raw: &str) -> Result<String, StratbenchError> {
    let ticker = raw.trim().to_uppercase();
    if !is_valid_ticker(&ticker) {
        return Err(StratbenchError::ConfigInvalid {
            section: "cli".into(),
            key: "ticker".into(),
            reason: format!("invalid ticker '{raw}'"),
        });
    }
    Ok(ticker)
}

fn load_series(
    data: &dyn DataPort,
    ticker: &str,
    lookback_days: u32,
) -> Result<BarSeries, StratbenchError> {
    let bars = data.fetch_bars(ticker, lookback_days)?;
    if bars.is_empty() {
        return Err(StratbenchError::NoData {
            ticker: ticker.to_string(),
        });
    }
    BarSeries::new(ticker, bars)
}

fn run_backtest(
    config: Option<&Path>,
    ticker: &str,
    strategy: &str,
    days: Option<u32>,
    report: &dyn ReportPort,
) -> Result<String, StratbenchError> {
    let settings = load_settings_from(config)?;
    let ticker = normalize_ticker(ticker)?;
    let id: StrategyId = strategy.parse()?;
    let days = days.unwrap_or(settings.lookback_days);

    let data = build_data_port(&settings);
    let registry = StrategyRegistry::from_ids(&[id], &settings.params);
    let evaluator = build_evaluator(&data, &settings, registry);

    eprintln!("Backtesting {} on {} ({} days)", id.display_name(), ticker, days);
    let result = evaluator.run_single(id, &ticker, days)?;
    report.render_result(&result)
}

fn run_rank(
    config: Option<&Path>,
    ticker: &str,
    days: Option<u32>,
    report: &dyn ReportPort,
) -> Result<String, StratbenchError> {
    let settings = load_settings_from(config)?;
    let ticker = normalize_ticker(ticker)?;
    let days = days.unwrap_or(settings.lookback_days);

    let data = build_data_port(&settings);
    let registry = StrategyRegistry::from_ids(&settings.strategies, &settings.params);
    let evaluator = build_evaluator(&data, &settings, registry);

    eprintln!(
        "Ranking {} strategies on {} ({} days)",
        evaluator.registry().len(),
        ticker,
        days
    );
    let series = evaluator.load_series(&ticker, days)?;
    let ranking = evaluator.rank(&series);
    report.render_ranking(&ticker, &ranking)
}

fn run_summary(
    config: Option<&Path>,
    tickers: Option<&str>,
    top_n: Option<usize>,
    days: Option<u32>,
    report: &dyn ReportPort,
) -> Result<String, StratbenchError> {
    let settings = load_settings_from(config)?;
    let top_n = top_n.unwrap_or(settings.top_n);
    let days = days.unwrap_or(settings.lookback_days);

    let data = build_data_port(&settings);
    let registry = StrategyRegistry::from_ids(&settings.strategies, &settings.params);
    let evaluator = build_evaluator(&data, &settings, registry);

    // Explicit tickers win over config; with neither, every CSV file is a candidate.
    let cli_feed = tickers.map(|list| StaticTickerFeed::from_csv_list("cli", list));
    let config_feed = StaticTickerFeed::new("config", settings.summary_tickers.clone());
    let feed: &dyn TickerFeed = match &cli_feed {
        Some(feed) => feed,
        None if !config_feed.is_empty() => &config_feed,
        None => data.inner(),
    };

    eprintln!("Building summary from feed '{}' (top {})", feed.name(), top_n);
    let entries = generate_summary(&evaluator, &[feed], top_n, days);
    report.render_summary(&entries)
}

fn run_plan(
    config: Option<&Path>,
    ticker: &str,
    days: Option<u32>,
    report: &dyn ReportPort,
) -> Result<String, StratbenchError> {
    let settings = load_settings_from(config)?;
    let ticker = normalize_ticker(ticker)?;
    let days = days.unwrap_or(settings.lookback_days);

    let data = build_data_port(&settings);
    let series = load_series(&data, &ticker, days)?;
    let plan = plan_trade(series.bars(), &ticker, &settings.params)?;
    report.render_plan(&plan)
}

fn run_indicators(
    config: Option<&Path>,
    ticker: &str,
    days: Option<u32>,
    entry_price: Option<f64>,
    report: &dyn ReportPort,
) -> Result<String, StratbenchError> {
    let settings = load_settings_from(config)?;
    let ticker = normalize_ticker(ticker)?;
    let days = days.unwrap_or(settings.lookback_days);

    let data = build_data_port(&settings);
    let series = load_series(&data, &ticker, days)?;
    let snapshot = IndicatorSnapshot::compute(&ticker, series.bars())?;
    let recommendation = entry_price
        .map(|price| recommend(&snapshot, price))
        .transpose()?;
    report.render_indicators(&snapshot, recommendation.as_ref())
}

fn run_validate(config: &Path) -> Result<String, StratbenchError> {
    let settings = load_settings_from(Some(config))?;

    let mut out = String::from("Configuration is valid.\n");
    out.push_str(&format!("  csv_dir:        {}\n", settings.csv_dir.display()));
    out.push_str(&format!("  lookback_days:  {}\n", settings.lookback_days));
    out.push_str(&format!("  min_bars:       {}\n", settings.min_bars));
    out.push_str(&format!("  initial_cash:   {:.2}\n", settings.backtest.initial_cash));
    out.push_str("  strategies:\n");
    for id in &settings.strategies {
        out.push_str(&format!("    {:<16} {}\n", id.key(), id.display_name()));
    }
    Ok(out)
}

fn list_strategies() -> String {
    StrategyId::ALL
        .iter()
        .map(|id| format!("{:<16} {}\n", id.key(), id.display_name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ticker_uppercases() {
        assert_eq!(normalize_ticker(" amc ").unwrap(), "AMC");
        assert!(matches!(
            normalize_ticker("a b"),
            Err(StratbenchError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn strategies_lists_every_builtin() {
        let listing = list_strategies();
        assert_eq!(listing.lines().count(), StrategyId::ALL.len());
        assert!(listing.contains("mean_reversion"));
        assert!(listing.contains("MomentumStrategy"));
    }

    #[test]
    fn parses_backtest_arguments() {
        let cli = Cli::try_parse_from([
            "stratbench",
            "backtest",
            "--ticker",
            "AMC",
            "--strategy",
            "momentum",
            "--days",
            "90",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Backtest {
                ticker,
                strategy,
                days,
                json,
                config,
            } => {
                assert_eq!(ticker, "AMC");
                assert_eq!(strategy, "momentum");
                assert_eq!(days, Some(90));
                assert!(json);
                assert!(config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
