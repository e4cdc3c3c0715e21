//! Strategy evaluator: backtests every registered strategy against one
//! ticker's history and ranks the outcomes.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::{info, warn};

use super::backtest::{BacktestEngine, BacktestResult};
use super::bar::BarSeries;
use super::error::{StrategyError, StratbenchError};
use super::strategy::{StrategyId, StrategyRegistry};
use crate::ports::data_port::DataPort;

/// Fewest bars the evaluator accepts before running any strategy.
pub const DEFAULT_MIN_BARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub strategy_name: String,
    pub result: BacktestResult,
}

/// Results ordered by `total_return`, best first. Equal returns keep
/// registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedEvaluation {
    pub entries: Vec<RankedEntry>,
}

impl RankedEvaluation {
    fn from_unsorted(mut entries: Vec<RankedEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.result
                .total_return
                .partial_cmp(&a.result.total_return)
                .unwrap_or(Ordering::Equal)
        });
        RankedEvaluation { entries }
    }

    pub fn best(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter()
    }
}

pub struct StrategyEvaluator<'a> {
    data: &'a dyn DataPort,
    registry: StrategyRegistry,
    engine: BacktestEngine,
    min_bars: usize,
}

impl<'a> StrategyEvaluator<'a> {
    pub fn new(data: &'a dyn DataPort, registry: StrategyRegistry, engine: BacktestEngine) -> Self {
        StrategyEvaluator {
            data,
            registry,
            engine,
            min_bars: DEFAULT_MIN_BARS,
        }
    }

    pub fn with_min_bars(mut self, min_bars: usize) -> Self {
        self.min_bars = min_bars;
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Fetch and validate the history for `ticker`.
    pub fn load_series(&self, ticker: &str, lookback_days: u32) -> Result<BarSeries, StratbenchError> {
        let bars = self.data.fetch_bars(ticker, lookback_days)?;
        if bars.is_empty() {
            return Err(StratbenchError::NoData {
                ticker: ticker.to_string(),
            });
        }
        if bars.len() < self.min_bars {
            return Err(StratbenchError::InsufficientData {
                ticker: ticker.to_string(),
                bars: bars.len(),
                minimum: self.min_bars,
            });
        }
        BarSeries::new(ticker, bars)
    }

    /// Rank every registered strategy on `ticker`. Never fails: data problems
    /// yield an empty ranking and faulty strategies are left out, with the
    /// reason logged.
    pub fn run_all_backtests(&self, ticker: &str, lookback_days: u32) -> RankedEvaluation {
        info!(ticker, lookback_days, strategies = self.registry.len(), "evaluating strategies");

        let series = match self.load_series(ticker, lookback_days) {
            Ok(series) => series,
            Err(err) => {
                warn!(ticker, error = %err, "evaluation skipped");
                return RankedEvaluation::default();
            }
        };
        self.rank(&series)
    }

    /// Rank every registered strategy on an already loaded series.
    pub fn rank(&self, series: &BarSeries) -> RankedEvaluation {
        let entries = self
            .registry
            .iter()
            .filter_map(|strategy| match self.engine.try_run(strategy, series) {
                Ok(result) => Some(RankedEntry {
                    strategy_name: strategy.name().to_string(),
                    result,
                }),
                Err(err) => {
                    warn!(
                        strategy = %strategy.name(),
                        ticker = series.ticker(),
                        error = %err,
                        "strategy excluded from ranking"
                    );
                    None
                }
            })
            .collect();

        let ranking = RankedEvaluation::from_unsorted(entries);
        if let Some(best) = ranking.best() {
            info!(
                ticker = series.ticker(),
                best = %best.strategy_name,
                total_return = best.result.total_return,
                "evaluation complete"
            );
        }
        ranking
    }

    /// Backtest one registered strategy. Unlike the ranking, data and
    /// parameter problems are reported to the caller.
    pub fn run_single(
        &self,
        id: StrategyId,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<BacktestResult, StratbenchError> {
        let strategy = self
            .registry
            .get(id)
            .ok_or_else(|| StratbenchError::UnknownStrategy {
                name: id.key().to_string(),
            })?;
        let series = self.load_series(ticker, lookback_days)?;

        self.engine
            .try_run(strategy, &series)
            .map_err(|err| match err {
                StrategyError::InvalidParameter { name, reason } => StratbenchError::ConfigInvalid {
                    section: id.key().to_string(),
                    key: name.to_string(),
                    reason,
                },
                other => StratbenchError::InvalidSeries {
                    ticker: ticker.to_string(),
                    reason: other.to_string(),
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::Bar;
    use crate::domain::strategy::{PercentageStrategy, StrategyParams};
    use crate::domain::test_support::{bars_from_closes, rising_bars};
    use std::collections::HashMap;

    struct FixedData {
        bars: HashMap<String, Vec<Bar>>,
    }

    impl FixedData {
        fn with(ticker: &str, bars: Vec<Bar>) -> Self {
            let mut map = HashMap::new();
            map.insert(ticker.to_string(), bars);
            FixedData { bars: map }
        }
    }

    impl DataPort for FixedData {
        fn fetch_bars(&self, ticker: &str, _lookback_days: u32) -> Result<Vec<Bar>, StratbenchError> {
            if ticker == "FAIL" {
                return Err(StratbenchError::DataFetch {
                    ticker: ticker.into(),
                    reason: "unreachable".into(),
                });
            }
            Ok(self.bars.get(ticker).cloned().unwrap_or_default())
        }
    }

    fn evaluator(data: &FixedData) -> StrategyEvaluator<'_> {
        StrategyEvaluator::new(data, StrategyRegistry::with_defaults(), BacktestEngine::default())
    }

    #[test]
    fn ranking_is_sorted_descending() {
        let data = FixedData::with("UP", rising_bars(60, 100.0, 1.0));
        let ranking = evaluator(&data).run_all_backtests("UP", 60);

        assert_eq!(ranking.len(), 4);
        for pair in ranking.entries.windows(2) {
            assert!(pair[0].result.total_return >= pair[1].result.total_return);
        }
    }

    #[test]
    fn ties_keep_registration_order() {
        let data = FixedData::with("FLAT", bars_from_closes(&[50.0; 40]));
        let ranking = evaluator(&data).run_all_backtests("FLAT", 60);

        let names: Vec<&str> = ranking.iter().map(|e| e.strategy_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "MeanReversionStrategy",
                "VolatilityStrategy",
                "PercentageStrategy",
                "MomentumStrategy"
            ]
        );
        assert!(ranking.iter().all(|e| e.result.total_return == 0.0));
    }

    #[test]
    fn fewer_than_min_bars_yields_empty_ranking() {
        let data = FixedData::with("SHORT", rising_bars(19, 100.0, 1.0));
        assert!(evaluator(&data).run_all_backtests("SHORT", 60).is_empty());
    }

    #[test]
    fn fetch_failure_yields_empty_ranking() {
        let data = FixedData::with("UP", rising_bars(60, 100.0, 1.0));
        assert!(evaluator(&data).run_all_backtests("FAIL", 60).is_empty());
        assert!(evaluator(&data).run_all_backtests("MISSING", 60).is_empty());
    }

    #[test]
    fn invalid_strategy_is_excluded() {
        let data = FixedData::with("UP", rising_bars(60, 100.0, 1.0));
        let mut registry = StrategyRegistry::with_defaults();
        registry.register(Box::new(PercentageStrategy::new(-5.0, 5.0)));

        let ranking = StrategyEvaluator::new(&data, registry, BacktestEngine::default())
            .run_all_backtests("UP", 60);
        assert_eq!(ranking.len(), 4);
    }

    #[test]
    fn run_single_returns_requested_strategy() {
        let data = FixedData::with("UP", rising_bars(60, 100.0, 1.0));
        let result = evaluator(&data)
            .run_single(StrategyId::Momentum, "UP", 60)
            .unwrap();
        assert_eq!(result.strategy_name, "MomentumStrategy");
        assert_eq!(result.ticker, "UP");
    }

    #[test]
    fn run_single_reports_missing_strategy_and_data() {
        let data = FixedData::with("UP", rising_bars(60, 100.0, 1.0));
        let only_momentum =
            StrategyRegistry::from_ids(&[StrategyId::Momentum], &StrategyParams::default());
        let eval = StrategyEvaluator::new(&data, only_momentum, BacktestEngine::default());

        assert!(matches!(
            eval.run_single(StrategyId::Volatility, "UP", 60),
            Err(StratbenchError::UnknownStrategy { .. })
        ));
        assert!(matches!(
            eval.run_single(StrategyId::Momentum, "MISSING", 60),
            Err(StratbenchError::NoData { .. })
        ));
    }

    #[test]
    fn run_single_maps_parameter_errors_to_config() {
        let data = FixedData::with("UP", rising_bars(60, 100.0, 1.0));
        let mut params = StrategyParams::default();
        params.momentum.roc_window = 1;
        let registry = StrategyRegistry::from_ids(&[StrategyId::Momentum], &params);
        let eval = StrategyEvaluator::new(&data, registry, BacktestEngine::default());

        assert!(matches!(
            eval.run_single(StrategyId::Momentum, "UP", 60),
            Err(StratbenchError::ConfigInvalid { .. })
        ));
    }
}
