//! Mean reversion: fade closes outside the Bollinger band when RSI confirms
//! the stretch.

use crate::domain::bar::Bar;
use crate::domain::decision::{Signal, TradeDecision};
use crate::domain::error::StrategyError;
use crate::domain::indicator::{IndicatorValue, calculate_bollinger, calculate_rsi, rsi};
use crate::domain::strategy::{Strategy, StrategyId, latest_price};

#[derive(Debug, Clone, PartialEq)]
pub struct MeanReversionStrategy {
    /// Overbought level; oversold is `100 - rsi_threshold`.
    pub rsi_threshold: f64,
    pub rsi_period: usize,
    pub bb_window: usize,
    pub bb_std: f64,
}

impl MeanReversionStrategy {
    pub fn new(rsi_threshold: f64, bb_window: usize, bb_std: f64) -> Self {
        Self {
            rsi_threshold,
            rsi_period: rsi::DEFAULT_PERIOD,
            bb_window,
            bb_std,
        }
    }
}

impl Default for MeanReversionStrategy {
    fn default() -> Self {
        Self::new(70.0, 20, 2.0)
    }
}

impl Strategy for MeanReversionStrategy {
    fn name(&self) -> &str {
        StrategyId::MeanReversion.display_name()
    }

    fn min_bars(&self) -> usize {
        (self.bb_window + 1).max(self.rsi_period + 1)
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if !(self.rsi_threshold > 0.0 && self.rsi_threshold < 100.0) {
            return Err(StrategyError::InvalidParameter {
                name: "rsi_threshold",
                reason: format!("must be between 0 and 100, got {}", self.rsi_threshold),
            });
        }
        if self.bb_window < 2 {
            return Err(StrategyError::InvalidParameter {
                name: "bb_window",
                reason: "must be at least 2".into(),
            });
        }
        if self.rsi_period == 0 {
            return Err(StrategyError::InvalidParameter {
                name: "rsi_period",
                reason: "must be at least 1".into(),
            });
        }
        if !(self.bb_std > 0.0 && self.bb_std.is_finite()) {
            return Err(StrategyError::InvalidParameter {
                name: "bb_std",
                reason: format!("must be positive, got {}", self.bb_std),
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

        let window = &bars[bars.len() - self.bb_window..];
        let bands = calculate_bollinger(window, self.bb_window, self.bb_std).latest();
        let strength = calculate_rsi(bars, self.rsi_period).latest_simple();

        let (Some(IndicatorValue::Bollinger { upper, lower, .. }), Some(rsi)) = (bands, strength) else {
            return Ok(TradeDecision::hold(Some(price)));
        };

        let signal = if price > upper && rsi > self.rsi_threshold {
            Signal::Sell
        } else if price < lower && rsi < 100.0 - self.rsi_threshold {
            Signal::Buy
        } else {
            Signal::Hold
        };
        Ok(TradeDecision::fixed_band(signal, price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::bars_from_closes;

    #[test]
    fn spike_above_upper_band_with_high_rsi_sells() {
        let mut closes = vec![99.0];
        closes.extend((100..=118).map(f64::from));
        closes.push(140.0);

        let d = MeanReversionStrategy::default()
            .evaluate(&bars_from_closes(&closes), "AMC")
            .unwrap();
        assert_eq!(d.signal, Signal::Sell);
        assert_eq!(d.stop_loss, Some(144.2));
        assert_eq!(d.take_profit, Some(133.0));
    }

    #[test]
    fn crash_below_lower_band_with_low_rsi_buys() {
        let mut closes: Vec<f64> = (82..=101).rev().map(f64::from).collect();
        closes.push(60.0);

        let d = MeanReversionStrategy::default()
            .evaluate(&bars_from_closes(&closes), "AMC")
            .unwrap();
        assert_eq!(d.signal, Signal::Buy);
        assert!(d.stop_loss.unwrap() < 60.0);
        assert!(d.take_profit.unwrap() > 60.0);
    }

    #[test]
    fn flat_series_holds() {
        let d = MeanReversionStrategy::default()
            .evaluate(&bars_from_closes(&[100.0; 30]), "AMC")
            .unwrap();
        assert!(d.is_hold());
        assert_eq!(d.price, Some(100.0));
    }

    #[test]
    fn short_history_holds() {
        let d = MeanReversionStrategy::default()
            .evaluate(&bars_from_closes(&[100.0; 20]), "AMC")
            .unwrap();
        assert!(d.is_hold());
        assert_eq!(d.price, None);
    }

    #[test]
    fn narrow_band_width_is_not_rounded_away() {
        // close sits 0.006 above the 20-bar mean, stddev is about 10
        let mut closes = vec![100.0];
        closes.extend((0..19).map(|i| if i % 2 == 0 { 90.0 } else { 110.0 }));
        closes.push(99.48);
        let bars = bars_from_closes(&closes);

        let narrow = MeanReversionStrategy::new(1.0, 20, 0.004);
        assert!(narrow.validate().is_ok());
        assert_eq!(narrow.evaluate(&bars, "AMC").unwrap().signal, Signal::Hold);

        let tighter = MeanReversionStrategy::new(1.0, 20, 0.0001);
        assert_eq!(tighter.evaluate(&bars, "AMC").unwrap().signal, Signal::Sell);
    }

    #[test]
    fn validate_checks_thresholds() {
        assert!(MeanReversionStrategy::new(120.0, 20, 2.0).validate().is_err());
        assert!(MeanReversionStrategy::new(70.0, 1, 2.0).validate().is_err());
        assert!(MeanReversionStrategy::new(70.0, 20, 0.0).validate().is_err());
        assert!(MeanReversionStrategy::default().validate().is_ok());
    }
}
