//! Entry recommendation: stop/take levels for a planned entry, sized either
//! as fixed percentages or from ATR when the tape is active.

use serde::Serialize;
use std::fmt;

use super::decision::round2;
use super::error::StratbenchError;
use super::technical::IndicatorSnapshot;

const PROFIT_TARGET_PCT: f64 = 10.0;
const STOP_LOSS_PCT: f64 = 5.0;
const PROFIT_ATR_MULT: f64 = 3.0;
const LOSS_ATR_MULT: f64 = 2.0;

const HIGH_VOLATILITY_ATR: f64 = 1.5;
const STRONG_MACD: f64 = 1.0;
const STRONG_ROC_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationKind {
    PercentageBased,
    VolatilityBased,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationKind::PercentageBased => write!(f, "PERCENTAGE_BASED"),
            RecommendationKind::VolatilityBased => write!(f, "VOLATILITY_BASED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecommendation {
    pub ticker: String,
    pub kind: RecommendationKind,
    pub entry_price: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub expected_profit: f64,
    pub expected_loss: f64,
}

/// ATR sizing when volatility is high, momentum is strong or an oscillator
/// is at an extreme. Without a defined ATR the percentage sizing is used.
pub fn select_kind(snapshot: &IndicatorSnapshot) -> RecommendationKind {
    let Some(atr) = snapshot.atr else {
        return RecommendationKind::PercentageBased;
    };

    let high_volatility = atr > HIGH_VOLATILITY_ATR;
    let strong_momentum = snapshot.macd.is_some_and(|m| m.abs() > STRONG_MACD)
        || snapshot.roc_pct.is_some_and(|r| r.abs() > STRONG_ROC_PCT);
    let extreme = snapshot.rsi.is_some_and(|r| !(30.0..=70.0).contains(&r))
        || snapshot.stochastic.is_some_and(|s| !(20.0..=80.0).contains(&s));

    if high_volatility || strong_momentum || extreme {
        RecommendationKind::VolatilityBased
    } else {
        RecommendationKind::PercentageBased
    }
}

pub fn recommend(
    snapshot: &IndicatorSnapshot,
    entry_price: f64,
) -> Result<TradeRecommendation, StratbenchError> {
    if !(entry_price > 0.0 && entry_price.is_finite()) {
        return Err(StratbenchError::InvalidSeries {
            ticker: snapshot.ticker.clone(),
            reason: format!("entry price must be positive, got {entry_price}"),
        });
    }

    let kind = select_kind(snapshot);
    let (take_profit, stop_loss) = match (kind, snapshot.atr) {
        // a stop cannot sit below zero, however wide the ATR
        (RecommendationKind::VolatilityBased, Some(atr)) => (
            entry_price + PROFIT_ATR_MULT * atr,
            (entry_price - LOSS_ATR_MULT * atr).max(0.0),
        ),
        _ => (
            entry_price * (1.0 + PROFIT_TARGET_PCT / 100.0),
            entry_price * (1.0 - STOP_LOSS_PCT / 100.0),
        ),
    };

    Ok(TradeRecommendation {
        ticker: snapshot.ticker.clone(),
        kind,
        entry_price: round2(entry_price),
        take_profit: round2(take_profit),
        stop_loss: round2(stop_loss),
        expected_profit: round2(take_profit - entry_price),
        expected_loss: round2(entry_price - stop_loss),
    })
}
