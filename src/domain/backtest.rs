//! Backtest engine: drives one strategy across a bar series.
//!
//! Starting after a warm-up offset, the strategy sees the prefix ending at
//! each bar and its decision is applied at that bar's close. A strategy fault
//! on one bar degrades to a hold for that bar only. The result carries the
//! last evaluated decision plus the cumulative return.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::bar::BarSeries;
use super::decision::{Signal, TradeDecision, round2};
use super::error::StrategyError;
use super::metrics::BacktestMetrics;
use super::portfolio::{EquityPoint, PortfolioState};
use super::strategy::Strategy;

pub const DEFAULT_INITIAL_CASH: f64 = 10_000.0;
pub const DEFAULT_WARMUP_BARS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    /// Index of the first simulated bar.
    pub warmup_bars: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_cash: DEFAULT_INITIAL_CASH,
            warmup_bars: DEFAULT_WARMUP_BARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeLogEntry {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub strategy_name: String,
    pub ticker: String,
    pub final_signal: Signal,
    pub final_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub expected_profit: f64,
    pub expected_loss: f64,
    /// Final portfolio value minus initial cash.
    pub total_return: f64,
    pub final_value: f64,
    pub trade_log: Vec<TradeLogEntry>,
    pub equity_curve: Vec<EquityPoint>,
    pub metrics: BacktestMetrics,
}

impl BacktestResult {
    fn from_decision(strategy_name: &str, ticker: &str, decision: TradeDecision) -> Self {
        BacktestResult {
            strategy_name: strategy_name.to_string(),
            ticker: ticker.to_string(),
            final_signal: decision.signal,
            final_price: decision.price,
            stop_loss: decision.stop_loss,
            take_profit: decision.take_profit,
            expected_profit: decision.expected_profit,
            expected_loss: decision.expected_loss,
            total_return: 0.0,
            final_value: 0.0,
            trade_log: Vec::new(),
            equity_curve: Vec::new(),
            metrics: BacktestMetrics::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        BacktestEngine { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Validate the strategy's parameters, then run it.
    pub fn try_run(
        &self,
        strategy: &dyn Strategy,
        series: &BarSeries,
    ) -> Result<BacktestResult, StrategyError> {
        strategy.validate()?;
        Ok(self.run(strategy, series))
    }

    pub fn run(&self, strategy: &dyn Strategy, series: &BarSeries) -> BacktestResult {
        let ticker = series.ticker();
        let bars = series.bars();
        let initial_cash = self.config.initial_cash;

        if bars.len() <= self.config.warmup_bars {
            debug!(
                strategy = %strategy.name(),
                ticker,
                bars = bars.len(),
                warmup = self.config.warmup_bars,
                "nothing to simulate after warm-up"
            );
            let mut result =
                BacktestResult::from_decision(strategy.name(), ticker, TradeDecision::hold(None));
            result.final_value = initial_cash;
            return result;
        }

        let mut portfolio = PortfolioState::new(initial_cash);
        let mut trade_log = Vec::new();
        let mut trips = Vec::new();
        let mut equity_curve = Vec::with_capacity(bars.len() - self.config.warmup_bars);
        let mut last_decision = TradeDecision::hold(None);

        for (i, bar) in bars.iter().enumerate().skip(self.config.warmup_bars) {
            let decision = match strategy.evaluate(series.prefix(i), ticker) {
                Ok(decision) => decision,
                Err(err) => {
                    warn!(
                        strategy = %strategy.name(),
                        ticker,
                        date = %bar.date,
                        error = %err,
                        "strategy fault, holding for this bar"
                    );
                    TradeDecision::hold(None)
                }
            };

            match decision.signal {
                Signal::Buy if portfolio.is_flat() => {
                    if portfolio.open_long(bar.close, bar.date) {
                        debug!(strategy = %strategy.name(), ticker, date = %bar.date, price = bar.close, "opened position");
                        trade_log.push(log_entry(bar.date, TradeAction::Buy, bar.close, &decision));
                    }
                }
                Signal::Sell if !portfolio.is_flat() => {
                    if let Some(trip) = portfolio.close_long(bar.close, bar.date) {
                        debug!(strategy = %strategy.name(), ticker, date = %bar.date, price = bar.close, pnl = trip.pnl, "closed position");
                        trade_log.push(log_entry(bar.date, TradeAction::Sell, bar.close, &decision));
                        trips.push(trip);
                    }
                }
                _ => {}
            }

            equity_curve.push(EquityPoint {
                date: bar.date,
                equity: portfolio.total_value(bar.close),
            });
            last_decision = decision;
        }

        let final_value = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(initial_cash);
        let metrics = BacktestMetrics::compute(initial_cash, &equity_curve, &trips);

        BacktestResult {
            total_return: round2(final_value - initial_cash),
            final_value: round2(final_value),
            trade_log,
            equity_curve,
            metrics,
            ..BacktestResult::from_decision(strategy.name(), ticker, last_decision)
        }
    }
}

fn log_entry(date: NaiveDate, action: TradeAction, price: f64, decision: &TradeDecision) -> TradeLogEntry {
    TradeLogEntry {
        date,
        action,
        price: round2(price),
        stop_loss: decision.stop_loss,
        take_profit: decision.take_profit,
    }
}
