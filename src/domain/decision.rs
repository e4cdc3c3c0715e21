//! Trade decisions emitted by strategies, one per evaluated bar.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
            Signal::Hold => write!(f, "hold"),
        }
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Signal::Buy),
            "sell" => Ok(Signal::Sell),
            "hold" => Ok(Signal::Hold),
            other => Err(format!("unknown signal '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeDecision {
    pub signal: Signal,
    pub price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub expected_profit: f64,
    pub expected_loss: f64,
}

impl TradeDecision {
    /// Hold with no price levels and zero expected profit/loss.
    pub fn hold(price: Option<f64>) -> Self {
        Self {
            signal: Signal::Hold,
            price: price.map(round2),
            stop_loss: None,
            take_profit: None,
            expected_profit: 0.0,
            expected_loss: 0.0,
        }
    }

    /// Directional decision with stop/take levels. Levels are rounded to cents
    /// and expected profit/loss are reported as distances from `price`.
    pub fn directional(signal: Signal, price: f64, stop_loss: f64, take_profit: f64) -> Self {
        if signal == Signal::Hold {
            return Self::hold(Some(price));
        }
        let price = round2(price);
        let stop_loss = round2(stop_loss);
        let take_profit = round2(take_profit);
        Self {
            signal,
            price: Some(price),
            stop_loss: Some(stop_loss),
            take_profit: Some(take_profit),
            expected_profit: round2((take_profit - price).abs()),
            expected_loss: round2((price - stop_loss).abs()),
        }
    }

    /// Buy/sell with the fixed percentage band: long stop -3% / take +5%,
    /// short side mirrored (stop +3% / take -5%).
    pub fn fixed_band(signal: Signal, price: f64) -> Self {
        match signal {
            Signal::Buy => Self::directional(signal, price, price * 0.97, price * 1.05),
            Signal::Sell => Self::directional(signal, price, price * 1.03, price * 0.95),
            Signal::Hold => Self::hold(Some(price)),
        }
    }

    pub fn is_hold(&self) -> bool {
        self.signal == Signal::Hold
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
