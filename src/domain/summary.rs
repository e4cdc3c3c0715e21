//! Summary aggregator: the evaluator's top pick for every ticker drawn from
//! the configured feeds.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use super::backtest::TradeLogEntry;
use super::decision::Signal;
use super::evaluator::StrategyEvaluator;
use crate::ports::ticker_feed_port::TickerFeed;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub ticker: String,
    pub strategy_name: String,
    pub signal: Signal,
    pub price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub expected_profit: Option<f64>,
    pub expected_loss: Option<f64>,
    pub total_return: Option<f64>,
    pub trade_log: Vec<TradeLogEntry>,
}

/// Up to `top_n` tickers from each feed, upper-cased and de-duplicated in
/// first-seen order. A failing feed is logged and contributes nothing.
pub fn collect_tickers(feeds: &[&dyn TickerFeed], top_n: usize) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for feed in feeds {
        match feed.tickers(top_n) {
            Ok(list) => {
                for ticker in list.into_iter().take(top_n) {
                    let ticker = ticker.trim().to_uppercase();
                    if !ticker.is_empty() && !tickers.contains(&ticker) {
                        tickers.push(ticker);
                    }
                }
            }
            Err(err) => warn!(feed = feed.name(), error = %err, "ticker feed failed"),
        }
    }
    tickers
}

/// Evaluate every collected ticker in parallel and keep each one's best
/// strategy. Tickers with an empty ranking are left out.
pub fn generate_summary(
    evaluator: &StrategyEvaluator<'_>,
    feeds: &[&dyn TickerFeed],
    top_n: usize,
    lookback_days: u32,
) -> Vec<SummaryEntry> {
    let tickers = collect_tickers(feeds, top_n);
    info!(tickers = tickers.len(), lookback_days, "building summary");

    let entries: Vec<SummaryEntry> = tickers
        .par_iter()
        .filter_map(|ticker| {
            let ranking = evaluator.run_all_backtests(ticker, lookback_days);
            let Some(best) = ranking.best() else {
                warn!(ticker = %ticker, "no ranking, left out of summary");
                return None;
            };
            let result = &best.result;
            Some(SummaryEntry {
                ticker: ticker.clone(),
                strategy_name: best.strategy_name.clone(),
                signal: result.final_signal,
                price: finite(result.final_price),
                stop_loss: finite(result.stop_loss),
                take_profit: finite(result.take_profit),
                expected_profit: finite(Some(result.expected_profit)),
                expected_loss: finite(Some(result.expected_loss)),
                total_return: finite(Some(result.total_return)),
                trade_log: result.trade_log.clone(),
            })
        })
        .collect();

    info!(entries = entries.len(), "summary complete");
    entries
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
