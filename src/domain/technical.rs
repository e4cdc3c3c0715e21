//! Indicator snapshot of the newest bar and the composite signal scored from it.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::bar::Bar;
use super::decision::round2;
use super::error::StratbenchError;
use super::indicator::{
    IndicatorValue, atr, calculate_atr, calculate_macd_default, calculate_rsi,
    calculate_stochastic, rate_of_change, rsi, stochastic,
};

pub const SNAPSHOT_MIN_BARS: usize = 30;

/// Bars between the two closes compared by the rate of change.
const ROC_LAG: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompositeSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for CompositeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeSignal::Bullish => write!(f, "BULLISH"),
            CompositeSignal::Bearish => write!(f, "BEARISH"),
            CompositeSignal::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Per-indicator votes in {-1, 0, +1}. Undefined indicators vote 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndicatorScores {
    pub macd: i8,
    pub rsi: i8,
    pub stochastic: i8,
    pub roc: i8,
}

impl IndicatorScores {
    // weights x10: MACD 0.5, ROC 0.3, RSI 0.2, stochastic 0.4
    const MACD_WEIGHT: i32 = 5;
    const ROC_WEIGHT: i32 = 3;
    const RSI_WEIGHT: i32 = 2;
    const STOCHASTIC_WEIGHT: i32 = 4;

    pub fn weighted_sum(&self) -> f64 {
        self.weighted_tenths() as f64 / 10.0
    }

    fn weighted_tenths(&self) -> i32 {
        i32::from(self.macd) * Self::MACD_WEIGHT
            + i32::from(self.roc) * Self::ROC_WEIGHT
            + i32::from(self.rsi) * Self::RSI_WEIGHT
            + i32::from(self.stochastic) * Self::STOCHASTIC_WEIGHT
    }

    pub fn signal(&self) -> CompositeSignal {
        match self.weighted_tenths() {
            s if s > 0 => CompositeSignal::Bullish,
            s if s < 0 => CompositeSignal::Bearish,
            _ => CompositeSignal::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub ticker: String,
    pub date: NaiveDate,
    pub market_price: f64,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub rsi: Option<f64>,
    /// Percent change over the last 14 bars.
    pub roc_pct: Option<f64>,
    pub stochastic: Option<f64>,
    pub atr: Option<f64>,
    pub scores: IndicatorScores,
    pub signal: CompositeSignal,
}

impl IndicatorSnapshot {
    pub fn compute(ticker: &str, bars: &[Bar]) -> Result<Self, StratbenchError> {
        let last = match bars.last() {
            Some(bar) if bars.len() >= SNAPSHOT_MIN_BARS => bar,
            _ => {
                return Err(StratbenchError::InsufficientData {
                    ticker: ticker.to_string(),
                    bars: bars.len(),
                    minimum: SNAPSHOT_MIN_BARS,
                });
            }
        };

        let (macd, macd_signal) = match calculate_macd_default(bars).latest() {
            Some(IndicatorValue::Macd { line, signal, .. }) => (Some(line), Some(signal)),
            _ => (None, None),
        };
        let rsi = calculate_rsi(bars, rsi::DEFAULT_PERIOD).latest_simple();
        let roc_pct = rate_of_change(bars, ROC_LAG + 1).map(|r| r * 100.0);
        let stochastic = calculate_stochastic(bars, stochastic::DEFAULT_WINDOW).latest_simple();
        let atr = calculate_atr(bars, atr::DEFAULT_PERIOD).latest_simple();

        let scores = IndicatorScores {
            macd: match (macd, macd_signal) {
                (Some(line), Some(signal)) if line > signal => 1,
                (Some(_), Some(_)) => -1,
                _ => 0,
            },
            rsi: band_vote(rsi, 30.0, 70.0),
            stochastic: band_vote(stochastic, 20.0, 80.0),
            roc: match roc_pct {
                Some(r) if r > 0.0 => 1,
                Some(_) => -1,
                None => 0,
            },
        };

        Ok(IndicatorSnapshot {
            ticker: ticker.to_string(),
            date: last.date,
            market_price: round2(last.close),
            macd: macd.map(round2),
            macd_signal: macd_signal.map(round2),
            rsi: rsi.map(round2),
            roc_pct: roc_pct.map(round2),
            stochastic: stochastic.map(round2),
            atr: atr.map(round2),
            scores,
            signal: scores.signal(),
        })
    }
}

/// +1 below `low` (oversold), -1 above `high` (overbought), else 0.
fn band_vote(value: Option<f64>, low: f64, high: f64) -> i8 {
    match value {
        Some(v) if v < low => 1,
        Some(v) if v > high => -1,
        _ => 0,
    }
}
