//! Momentum strategy: follow a 10-bar rate of change past a threshold.

use crate::domain::bar::Bar;
use crate::domain::decision::{Signal, TradeDecision};
use crate::domain::error::StrategyError;
use crate::domain::indicator::rate_of_change;
use crate::domain::strategy::{Strategy, StrategyId, latest_price};

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumStrategy {
    /// Bars spanned by the rate of change, inclusive of both ends.
    pub roc_window: usize,
    /// Fractional change that triggers a signal (0.05 = 5%).
    pub threshold: f64,
}

impl MomentumStrategy {
    pub fn new(roc_window: usize, threshold: f64) -> Self {
        Self {
            roc_window,
            threshold,
        }
    }
}

impl Default for MomentumStrategy {
    fn default() -> Self {
        Self::new(11, 0.05)
    }
}

impl Strategy for MomentumStrategy {
    fn name(&self) -> &str {
        StrategyId::Momentum.display_name()
    }

    fn min_bars(&self) -> usize {
        self.roc_window
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if self.roc_window < 2 {
            return Err(StrategyError::InvalidParameter {
                name: "roc_window",
                reason: "must be at least 2".into(),
            });
        }
        if !(self.threshold >= 0.0 && self.threshold.is_finite()) {
            return Err(StrategyError::InvalidParameter {
                name: "roc_threshold",
                reason: format!("must be non-negative, got {}", self.threshold),
            });
        }
        Ok(())
    }

    fn evaluate(&self, bars: &[Bar], _ticker: &str) -> Result<TradeDecision, StrategyError> {
        let Some(price) = latest_price(bars)? else {
            return Ok(TradeDecision::hold(None));
        };
        if bars.len() < self.min_bars() {
            return Ok(TradeDecision::hold(None));
        }

        let Some(roc) = rate_of_change(bars, self.roc_window) else {
            return Ok(TradeDecision::hold(Some(price)));
        };

        let signal = if roc > self.threshold {
            Signal::Buy
        } else if roc < -self.threshold {
            Signal::Sell
        } else {
            Signal::Hold
        };
        Ok(TradeDecision::fixed_band(signal, price))
    }
}
