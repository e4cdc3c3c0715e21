//! ATR breakout strategy.
//!
//! The band is anchored on the previous bar: `prev_close ± ATR(prev)`. A close
//! above the band buys, below it sells. Stop and take are placed at multiples
//! of the current ATR, mirrored for sells.

use crate::domain::bar::Bar;
use crate::domain::decision::{Signal, TradeDecision};
use crate::domain::error::StrategyError;
use crate::domain::indicator::atr::{self, calculate_atr};
use crate::domain::strategy::{Strategy, StrategyId, latest_price};

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityStrategy {
    pub atr_period: usize,
    pub profit_multiplier: f64,
    pub loss_multiplier: f64,
}

impl VolatilityStrategy {
    pub fn new(atr_period: usize, profit_multiplier: f64, loss_multiplier: f64) -> Self {
        Self {
            atr_period,
            profit_multiplier,
            loss_multiplier,
        }
    }
}

impl Default for VolatilityStrategy {
    fn default() -> Self {
        Self::new(atr::DEFAULT_PERIOD, 3.0, 2.0)
    }
}

impl Strategy for VolatilityStrategy {
    fn name(&self) -> &str {
        StrategyId::Volatility.display_name()
    }

    /// ATR needs `period + 1` bars; the band needs it one bar earlier.
    fn min_bars(&self) -> usize {
        self.atr_period + 2
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if self.atr_period == 0 {
            return Err(StrategyError::InvalidParameter {
                name: "atr_period",
                reason: "must be at least 1".into(),
            });
        }
        for (name, value) in [
            ("atr_profit_mult", self.profit_multiplier),
            ("atr_loss_mult", self.loss_multiplier),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(StrategyError::InvalidParameter {
                    name,
                    reason: format!("must be positive, got {value}"),
                });
            }
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

        let window = &bars[bars.len() - self.min_bars()..];
        let series = calculate_atr(window, self.atr_period);
        let last = window.len() - 1;
        let (Some(prev_atr), Some(atr)) = (series.simple_at(last - 1), series.simple_at(last))
        else {
            return Ok(TradeDecision::hold(Some(price)));
        };
        if prev_atr <= 0.0 || atr <= 0.0 {
            return Ok(TradeDecision::hold(Some(price)));
        }

        let prev_close = window[last - 1].close;
        let upper = prev_close + prev_atr;
        let lower = prev_close - prev_atr;

        let decision = if price > upper {
            TradeDecision::directional(
                Signal::Buy,
                price,
                price - self.loss_multiplier * atr,
                price + self.profit_multiplier * atr,
            )
        } else if price < lower {
            TradeDecision::directional(
                Signal::Sell,
                price,
                price + self.loss_multiplier * atr,
                price - self.profit_multiplier * atr,
            )
        } else {
            TradeDecision::hold(Some(price))
        };
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{bars_from_closes, bars_from_hlc};
    use approx::assert_abs_diff_eq;

    /// 15 quiet bars (TR 2) followed by `last`.
    fn quiet_then(last: (f64, f64, f64)) -> Vec<Bar> {
        let mut hlc = vec![(101.0, 99.0, 100.0); 15];
        hlc.push(last);
        bars_from_hlc(&hlc)
    }

    #[test]
    fn breakout_above_band_buys() {
        let d = VolatilityStrategy::default()
            .evaluate(&quiet_then((106.0, 104.0, 105.0)), "AMC")
            .unwrap();

        // current ATR = (13 * 2 + 6) / 14
        assert_eq!(d.signal, Signal::Buy);
        assert_abs_diff_eq!(d.stop_loss.unwrap(), 100.43, epsilon = 1e-9);
        assert_abs_diff_eq!(d.take_profit.unwrap(), 111.86, epsilon = 1e-9);
        assert_abs_diff_eq!(d.expected_profit, 6.86, epsilon = 1e-9);
        assert_abs_diff_eq!(d.expected_loss, 4.57, epsilon = 1e-9);
    }

    #[test]
    fn breakdown_below_band_sells_with_mirrored_levels() {
        let d = VolatilityStrategy::default()
            .evaluate(&quiet_then((96.0, 94.0, 95.0)), "AMC")
            .unwrap();

        assert_eq!(d.signal, Signal::Sell);
        assert!(d.stop_loss.unwrap() > 95.0);
        assert!(d.take_profit.unwrap() < 95.0);
        assert_abs_diff_eq!(d.stop_loss.unwrap(), 99.57, epsilon = 1e-9);
        assert_abs_diff_eq!(d.take_profit.unwrap(), 88.14, epsilon = 1e-9);
    }

    #[test]
    fn inside_band_holds() {
        let d = VolatilityStrategy::default()
            .evaluate(&quiet_then((101.0, 99.0, 101.0)), "AMC")
            .unwrap();
        assert!(d.is_hold());
        assert_eq!(d.price, Some(101.0));
    }

    #[test]
    fn zero_atr_holds() {
        let d = VolatilityStrategy::default()
            .evaluate(&bars_from_closes(&[100.0; 20]), "AMC")
            .unwrap();
        assert!(d.is_hold());
    }

    #[test]
    fn short_history_holds_without_levels() {
        let bars = bars_from_hlc(&[(101.0, 99.0, 100.0); 15]);
        let d = VolatilityStrategy::default().evaluate(&bars, "AMC").unwrap();
        assert!(d.is_hold());
        assert!(d.stop_loss.is_none());
        assert!(d.take_profit.is_none());
    }

    #[test]
    fn validate_rejects_zero_period() {
        assert!(VolatilityStrategy::new(0, 3.0, 2.0).validate().is_err());
        assert!(VolatilityStrategy::new(14, -1.0, 2.0).validate().is_err());
        assert!(VolatilityStrategy::default().validate().is_ok());
    }
}
