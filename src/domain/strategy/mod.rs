//! Strategy abstraction and the built-in strategy variants.
//!
//! A strategy is stateless apart from its construction-time thresholds: given
//! the bars up to and including the bar being simulated, it returns one
//! [`TradeDecision`]. Insufficient history or undefined indicator values always
//! yield a hold with no price levels, never an error. Errors are reserved for
//! malformed input (non-positive prices) and bad parameters.

pub mod mean_reversion;
pub mod momentum;
pub mod percentage;
pub mod registry;
pub mod volatility;

pub use mean_reversion::MeanReversionStrategy;
pub use momentum::MomentumStrategy;
pub use percentage::PercentageStrategy;
pub use registry::StrategyRegistry;
pub use volatility::VolatilityStrategy;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::bar::Bar;
use crate::domain::decision::TradeDecision;
use crate::domain::error::{StrategyError, StratbenchError};

pub trait Strategy: Send + Sync {
    /// Display name carried into results, e.g. `"MomentumStrategy"`.
    fn name(&self) -> &str;

    /// Fewest bars for which the strategy can produce a directional signal.
    fn min_bars(&self) -> usize;

    /// Check construction-time parameters before a run.
    fn validate(&self) -> Result<(), StrategyError> {
        Ok(())
    }

    fn evaluate(&self, bars: &[Bar], ticker: &str) -> Result<TradeDecision, StrategyError>;
}

/// Identifiers of the built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    MeanReversion,
    Volatility,
    Percentage,
    Momentum,
}

impl StrategyId {
    /// Registration order used when no explicit list is configured.
    pub const ALL: [StrategyId; 4] = [
        StrategyId::MeanReversion,
        StrategyId::Volatility,
        StrategyId::Percentage,
        StrategyId::Momentum,
    ];

    /// Config/CLI key.
    pub fn key(&self) -> &'static str {
        match self {
            StrategyId::MeanReversion => "mean_reversion",
            StrategyId::Volatility => "volatility",
            StrategyId::Percentage => "percentage",
            StrategyId::Momentum => "momentum",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyId::MeanReversion => "MeanReversionStrategy",
            StrategyId::Volatility => "VolatilityStrategy",
            StrategyId::Percentage => "PercentageStrategy",
            StrategyId::Momentum => "MomentumStrategy",
        }
    }

    pub fn build(&self, params: &StrategyParams) -> Box<dyn Strategy> {
        match self {
            StrategyId::MeanReversion => Box::new(params.mean_reversion.clone()),
            StrategyId::Volatility => Box::new(params.volatility.clone()),
            StrategyId::Percentage => Box::new(params.percentage.clone()),
            StrategyId::Momentum => Box::new(params.momentum.clone()),
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StrategyId {
    type Err = StratbenchError;

    /// Accepts the config key (`mean_reversion`) or the display name
    /// (`MeanReversionStrategy`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        StrategyId::ALL
            .into_iter()
            .find(|id| {
                id.key().eq_ignore_ascii_case(needle)
                    || id.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| StratbenchError::UnknownStrategy {
                name: needle.to_string(),
            })
    }
}

/// Parse a comma-separated strategy list, rejecting unknown and repeated ids.
pub fn parse_strategy_list(input: &str) -> Result<Vec<StrategyId>, StratbenchError> {
    let mut ids = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let id: StrategyId = token.parse()?;
        if ids.contains(&id) {
            return Err(StratbenchError::ConfigInvalid {
                section: "evaluator".into(),
                key: "strategies".into(),
                reason: format!("duplicate strategy '{token}'"),
            });
        }
        ids.push(id);
    }
    Ok(ids)
}

/// Thresholds for every built-in strategy.
#[derive(Debug, Clone, Default)]
pub struct StrategyParams {
    pub percentage: PercentageStrategy,
    pub volatility: VolatilityStrategy,
    pub momentum: MomentumStrategy,
    pub mean_reversion: MeanReversionStrategy,
}

/// Close of the newest bar, validated as a usable trade price.
pub(crate) fn latest_price(bars: &[Bar]) -> Result<Option<f64>, StrategyError> {
    match bars.last() {
        None => Ok(None),
        Some(bar) if bar.close.is_finite() && bar.close > 0.0 => Ok(Some(bar.close)),
        Some(bar) => Err(StrategyError::InvalidPrice {
            price: bar.close,
            index: bars.len() - 1,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::bars_from_closes;

    #[test]
    fn strategy_id_parses_key_and_name() {
        assert_eq!("momentum".parse::<StrategyId>().unwrap(), StrategyId::Momentum);
        assert_eq!(
            "MeanReversionStrategy".parse::<StrategyId>().unwrap(),
            StrategyId::MeanReversion
        );
        assert_eq!(" Volatility ".parse::<StrategyId>().unwrap(), StrategyId::Volatility);
        assert!(matches!(
            "grid".parse::<StrategyId>(),
            Err(StratbenchError::UnknownStrategy { .. })
        ));
    }

    #[test]
    fn parse_strategy_list_keeps_order() {
        let ids = parse_strategy_list("percentage, momentum").unwrap();
        assert_eq!(ids, vec![StrategyId::Percentage, StrategyId::Momentum]);
    }

    #[test]
    fn parse_strategy_list_rejects_duplicates() {
        assert!(parse_strategy_list("momentum,Momentum").is_err());
    }

    #[test]
    fn built_strategy_reports_display_name() {
        let params = StrategyParams::default();
        for id in StrategyId::ALL {
            assert_eq!(id.build(&params).name(), id.display_name());
        }
    }

    #[test]
    fn latest_price_validates_close() {
        assert_eq!(latest_price(&[]).unwrap(), None);
        assert_eq!(latest_price(&bars_from_closes(&[1.0, 2.5])).unwrap(), Some(2.5));
        assert_eq!(
            latest_price(&bars_from_closes(&[1.0, -2.0])),
            Err(StrategyError::InvalidPrice {
                price: -2.0,
                index: 1
            })
        );
    }
}
