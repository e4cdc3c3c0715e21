//! Fixed-percentage baseline: always buys, with take-profit and stop-loss a
//! fixed percentage away from the latest close.

use crate::domain::bar::Bar;
use crate::domain::decision::{Signal, TradeDecision};
use crate::domain::error::StrategyError;
use crate::domain::strategy::{Strategy, StrategyId, latest_price};

#[derive(Debug, Clone, PartialEq)]
pub struct PercentageStrategy {
    /// Take-profit distance in percent (10.0 = +10%).
    pub profit_pct: f64,
    /// Stop-loss distance in percent (5.0 = -5%).
    pub stop_pct: f64,
}

impl PercentageStrategy {
    pub fn new(profit_pct: f64, stop_pct: f64) -> Self {
        Self {
            profit_pct,
            stop_pct,
        }
    }
}

impl Default for PercentageStrategy {
    fn default() -> Self {
        Self::new(10.0, 5.0)
    }
}

impl Strategy for PercentageStrategy {
    fn name(&self) -> &str {
        StrategyId::Percentage.display_name()
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if !(self.profit_pct > 0.0) {
            return Err(StrategyError::InvalidParameter {
                name: "profit_pct",
                reason: "must be positive".into(),
            });
        }
        if !(self.stop_pct > 0.0 && self.stop_pct < 100.0) {
            return Err(StrategyError::InvalidParameter {
                name: "stop_pct",
                reason: "must be between 0 and 100".into(),
            });
        }
        Ok(())
    }

    fn evaluate(&self, bars: &[Bar], _ticker: &str) -> Result<TradeDecision, StrategyError> {
        let Some(price) = latest_price(bars)? else {
            return Ok(TradeDecision::hold(None));
        };

        let take_profit = price * (1.0 + self.profit_pct / 100.0);
        let stop_loss = price * (1.0 - self.stop_pct / 100.0);
        Ok(TradeDecision::directional(
            Signal::Buy,
            price,
            stop_loss,
            take_profit,
        ))
    }
}
