//! Strategy planner: pick one strategy from the shape of recent price action
//! and ask it for a decision on the newest bar.

use serde::Serialize;
use tracing::info;

use super::bar::Bar;
use super::decision::TradeDecision;
use super::error::StratbenchError;
use super::strategy::{StrategyId, StrategyParams};

pub const PLANNER_MIN_BARS: usize = 20;

const MEAN_WINDOW: usize = 20;
const MEAN_DEVIATION: f64 = 0.10;
const MOMENTUM_LAG: usize = 10;
const MOMENTUM_FRACTION: f64 = 0.05;
const RANGE_WINDOW: usize = 14;
const RANGE_EXPANSION: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradePlan {
    pub ticker: String,
    pub strategy: StrategyId,
    pub strategy_name: String,
    pub reason: String,
    pub decision: TradeDecision,
}

/// First matching heuristic wins:
/// 1. close deviates more than 10% from its 20-bar mean
/// 2. close gained more than 5% of itself since 10 bars back
/// 3. today's range exceeds 1.5x the 14-bar average range
/// 4. otherwise the percentage baseline
///
/// `bars` must hold at least [`PLANNER_MIN_BARS`] entries.
pub fn select_strategy(bars: &[Bar]) -> (StrategyId, String) {
    let Some(last) = bars.last() else {
        return (StrategyId::Percentage, "no history".to_string());
    };
    let close = last.close;

    let mean_window = &bars[bars.len().saturating_sub(MEAN_WINDOW)..];
    let mean = mean_window.iter().map(|b| b.close).sum::<f64>() / mean_window.len() as f64;
    let deviation = if mean > 0.0 { (close - mean).abs() / mean } else { 0.0 };
    if deviation > MEAN_DEVIATION {
        return (
            StrategyId::MeanReversion,
            format!("close deviates {:.1}% from its {MEAN_WINDOW}-bar mean", deviation * 100.0),
        );
    }

    if bars.len() >= MOMENTUM_LAG {
        let gain = close - bars[bars.len() - MOMENTUM_LAG].close;
        if gain > MOMENTUM_FRACTION * close {
            return (
                StrategyId::Momentum,
                format!("close up {gain:.2} over {MOMENTUM_LAG} bars"),
            );
        }
    }

    let range_window = &bars[bars.len().saturating_sub(RANGE_WINDOW)..];
    let avg_range = range_window.iter().map(Bar::range).sum::<f64>() / range_window.len() as f64;
    if last.range() > RANGE_EXPANSION * avg_range {
        return (
            StrategyId::Volatility,
            format!(
                "range {:.2} exceeds {RANGE_EXPANSION}x the {RANGE_WINDOW}-bar average {avg_range:.2}",
                last.range()
            ),
        );
    }

    (StrategyId::Percentage, "no dominant pattern".to_string())
}

pub fn plan_trade(
    bars: &[Bar],
    ticker: &str,
    params: &StrategyParams,
) -> Result<TradePlan, StratbenchError> {
    if bars.len() < PLANNER_MIN_BARS {
        return Err(StratbenchError::InsufficientData {
            ticker: ticker.to_string(),
            bars: bars.len(),
            minimum: PLANNER_MIN_BARS,
        });
    }

    let (id, reason) = select_strategy(bars);
    let strategy = id.build(params);
    info!(ticker, strategy = %strategy.name(), %reason, "selected strategy");

    let decision = strategy
        .evaluate(bars, ticker)
        .map_err(|err| StratbenchError::InvalidSeries {
            ticker: ticker.to_string(),
            reason: err.to_string(),
        })?;

    Ok(TradePlan {
        ticker: ticker.to_string(),
        strategy: id,
        strategy_name: strategy.name().to_string(),
        reason,
        decision,
    })
}
