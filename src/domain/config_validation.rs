//! Configuration loading and validation.
//!
//! Every key is optional; absent keys take the documented default. Present
//! keys must parse and lie in range, otherwise loading fails with the
//! offending section and key before anything runs.

use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::{StrategyError, StratbenchError};
use crate::domain::evaluator::DEFAULT_MIN_BARS;
use crate::domain::strategy::{
    MeanReversionStrategy, MomentumStrategy, PercentageStrategy, Strategy, StrategyId,
    StrategyParams, VolatilityStrategy, parse_strategy_list,
};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_CSV_DIR: &str = "data";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 60;
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone)]
pub struct Settings {
    pub csv_dir: PathBuf,
    /// Zero disables the bar cache.
    pub cache_ttl_secs: u64,
    pub backtest: BacktestConfig,
    pub lookback_days: u32,
    pub min_bars: usize,
    pub strategies: Vec<StrategyId>,
    pub params: StrategyParams,
    pub summary_tickers: Vec<String>,
    pub top_n: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            csv_dir: PathBuf::from(DEFAULT_CSV_DIR),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            backtest: BacktestConfig::default(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            min_bars: DEFAULT_MIN_BARS,
            strategies: StrategyId::ALL.to_vec(),
            params: StrategyParams::default(),
            summary_tickers: Vec::new(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

pub fn load_settings(config: &dyn ConfigPort) -> Result<Settings, StratbenchError> {
    let defaults = Settings::default();

    let csv_dir = config
        .get_string("data", "csv_dir")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or(defaults.csv_dir);
    let cache_ttl_secs = read(config, "data", "cache_ttl_secs", defaults.cache_ttl_secs)?;

    let backtest = BacktestConfig {
        initial_cash: read(config, "backtest", "initial_cash", defaults.backtest.initial_cash)?,
        warmup_bars: read(config, "backtest", "warmup_bars", defaults.backtest.warmup_bars)?,
    };
    if !(backtest.initial_cash > 0.0 && backtest.initial_cash.is_finite()) {
        return Err(invalid("backtest", "initial_cash", "initial_cash must be positive"));
    }

    let lookback_days = read(config, "evaluator", "lookback_days", defaults.lookback_days)?;
    if lookback_days == 0 {
        return Err(invalid("evaluator", "lookback_days", "lookback_days must be positive"));
    }
    let min_bars = read(config, "evaluator", "min_bars", defaults.min_bars)?;
    if min_bars == 0 {
        return Err(invalid("evaluator", "min_bars", "min_bars must be positive"));
    }

    let strategies = match config.get_string("evaluator", "strategies") {
        Some(raw) => parse_strategy_list(&raw)?,
        None => defaults.strategies,
    };
    if strategies.is_empty() {
        return Err(invalid("evaluator", "strategies", "no strategies enabled"));
    }

    let params = load_params(config)?;

    let summary_tickers = config.get_list("summary", "tickers").unwrap_or_default();
    if let Some(bad) = summary_tickers.iter().find(|t| !is_valid_ticker(t)) {
        return Err(invalid("summary", "tickers", &format!("invalid ticker '{bad}'")));
    }
    let top_n = read(config, "summary", "top_n", defaults.top_n)?;
    if top_n == 0 {
        return Err(invalid("summary", "top_n", "top_n must be positive"));
    }

    Ok(Settings {
        csv_dir,
        cache_ttl_secs,
        backtest,
        lookback_days,
        min_bars,
        strategies,
        params,
        summary_tickers,
        top_n,
    })
}

fn load_params(config: &dyn ConfigPort) -> Result<StrategyParams, StratbenchError> {
    let defaults = StrategyParams::default();

    let percentage = PercentageStrategy::new(
        read(config, "percentage", "profit_pct", defaults.percentage.profit_pct)?,
        read(config, "percentage", "stop_pct", defaults.percentage.stop_pct)?,
    );
    check(StrategyId::Percentage, &percentage)?;

    let volatility = VolatilityStrategy::new(
        read(config, "volatility", "atr_period", defaults.volatility.atr_period)?,
        read(config, "volatility", "atr_profit_mult", defaults.volatility.profit_multiplier)?,
        read(config, "volatility", "atr_loss_mult", defaults.volatility.loss_multiplier)?,
    );
    check(StrategyId::Volatility, &volatility)?;

    let momentum = MomentumStrategy::new(
        read(config, "momentum", "roc_window", defaults.momentum.roc_window)?,
        read(config, "momentum", "roc_threshold", defaults.momentum.threshold)?,
    );
    check(StrategyId::Momentum, &momentum)?;

    let mean_reversion = MeanReversionStrategy::new(
        read(config, "mean_reversion", "rsi_threshold", defaults.mean_reversion.rsi_threshold)?,
        read(config, "mean_reversion", "bb_window", defaults.mean_reversion.bb_window)?,
        read(config, "mean_reversion", "bb_std", defaults.mean_reversion.bb_std)?,
    );
    check(StrategyId::MeanReversion, &mean_reversion)?;

    Ok(StrategyParams {
        percentage,
        volatility,
        momentum,
        mean_reversion,
    })
}

/// Parse `[section] key` as `T`, or return `default` when absent.
fn read<T>(config: &dyn ConfigPort, section: &str, key: &str, default: T) -> Result<T, StratbenchError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(section, key, &format!("cannot parse '{}': {e}", raw.trim()))),
    }
}

fn check(id: StrategyId, strategy: &dyn Strategy) -> Result<(), StratbenchError> {
    strategy.validate().map_err(|err| match err {
        StrategyError::InvalidParameter { name, reason } => invalid(id.key(), name, &reason),
        other => invalid(id.key(), "*", &other.to_string()),
    })
}

fn invalid(section: &str, key: &str, reason: &str) -> StratbenchError {
    StratbenchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn is_valid_ticker(ticker: &str) -> bool {
    !ticker.is_empty()
        && ticker.len() <= 15
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid(content: &str, section: &str, key: &str) {
        match load_settings(&make_config(content)) {
            Err(StratbenchError::ConfigInvalid {
                section: s, key: k, ..
            }) => {
                assert_eq!(s, section);
                assert_eq!(k, key);
            }
            other => panic!("expected ConfigInvalid for [{section}] {key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let settings = load_settings(&make_config("")).unwrap();
        assert_eq!(settings.csv_dir, PathBuf::from("data"));
        assert_eq!(settings.cache_ttl_secs, 300);
        assert_eq!(settings.backtest, BacktestConfig::default());
        assert_eq!(settings.lookback_days, 60);
        assert_eq!(settings.min_bars, 20);
        assert_eq!(settings.strategies, StrategyId::ALL.to_vec());
        assert_eq!(settings.top_n, 5);
        assert!(settings.summary_tickers.is_empty());
    }

    #[test]
    fn full_config_is_applied() {
        let settings = load_settings(&make_config(
            r#"
[data]
csv_dir = /tmp/bars
cache_ttl_secs = 0

[backtest]
initial_cash = 5000
warmup_bars = 25

[evaluator]
lookback_days = 90
strategies = momentum, percentage

[percentage]
profit_pct = 8
stop_pct = 4

[volatility]
atr_profit_mult = 2.5

[momentum]
roc_threshold = 0.03

[mean_reversion]
rsi_threshold = 75
bb_std = 2.5

[summary]
tickers = AMC, gme, BRK.B
top_n = 3
"#,
        ))
        .unwrap();

        assert_eq!(settings.csv_dir, PathBuf::from("/tmp/bars"));
        assert_eq!(settings.cache_ttl_secs, 0);
        assert_eq!(settings.backtest.initial_cash, 5000.0);
        assert_eq!(settings.backtest.warmup_bars, 25);
        assert_eq!(settings.lookback_days, 90);
        assert_eq!(
            settings.strategies,
            vec![StrategyId::Momentum, StrategyId::Percentage]
        );
        assert_eq!(settings.params.percentage, PercentageStrategy::new(8.0, 4.0));
        assert_eq!(settings.params.volatility.profit_multiplier, 2.5);
        assert_eq!(settings.params.momentum.threshold, 0.03);
        assert_eq!(settings.params.mean_reversion.rsi_threshold, 75.0);
        assert_eq!(settings.params.mean_reversion.bb_std, 2.5);
        assert_eq!(settings.summary_tickers, vec!["AMC", "gme", "BRK.B"]);
        assert_eq!(settings.top_n, 3);
    }

    #[test]
    fn initial_cash_must_be_positive() {
        assert_invalid("[backtest]\ninitial_cash = 0\n", "backtest", "initial_cash");
        assert_invalid("[backtest]\ninitial_cash = -10\n", "backtest", "initial_cash");
    }

    #[test]
    fn non_numeric_value_fails() {
        assert_invalid("[backtest]\ninitial_cash = lots\n", "backtest", "initial_cash");
        assert_invalid("[backtest]\nwarmup_bars = -1\n", "backtest", "warmup_bars");
    }

    #[test]
    fn zero_windows_fail() {
        assert_invalid("[evaluator]\nlookback_days = 0\n", "evaluator", "lookback_days");
        assert_invalid("[evaluator]\nmin_bars = 0\n", "evaluator", "min_bars");
        assert_invalid("[volatility]\natr_period = 0\n", "volatility", "atr_period");
        assert_invalid("[momentum]\nroc_window = 1\n", "momentum", "roc_window");
        assert_invalid("[mean_reversion]\nbb_window = 1\n", "mean_reversion", "bb_window");
    }

    #[test]
    fn thresholds_out_of_domain_fail() {
        assert_invalid("[percentage]\nstop_pct = 100\n", "percentage", "stop_pct");
        assert_invalid("[percentage]\nprofit_pct = 0\n", "percentage", "profit_pct");
        assert_invalid("[volatility]\natr_loss_mult = 0\n", "volatility", "atr_loss_mult");
        assert_invalid("[momentum]\nroc_threshold = -0.1\n", "momentum", "roc_threshold");
        assert_invalid(
            "[mean_reversion]\nrsi_threshold = 100\n",
            "mean_reversion",
            "rsi_threshold",
        );
    }

    #[test]
    fn unknown_strategy_fails() {
        let result = load_settings(&make_config("[evaluator]\nstrategies = momentum, grid\n"));
        assert!(matches!(
            result,
            Err(StratbenchError::UnknownStrategy { name }) if name == "grid"
        ));
    }

    #[test]
    fn empty_strategy_list_fails() {
        assert_invalid("[evaluator]\nstrategies = ,\n", "evaluator", "strategies");
    }

    #[test]
    fn malformed_ticker_fails() {
        assert_invalid("[summary]\ntickers = AMC, $$$\n", "summary", "tickers");
        assert_invalid("[summary]\ntop_n = 0\n", "summary", "top_n");
    }

    #[test]
    fn ticker_charset() {
        assert!(is_valid_ticker("BRK.B"));
        assert!(is_valid_ticker("X:BTCUSD"));
        assert!(!is_valid_ticker(""));
        assert!(!is_valid_ticker("A B"));
    }
}
