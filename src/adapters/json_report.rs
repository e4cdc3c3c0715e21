//! JSON report adapter.

use serde::Serialize;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::StratbenchError;
use crate::domain::evaluator::RankedEvaluation;
use crate::domain::planner::TradePlan;
use crate::domain::recommendation::TradeRecommendation;
use crate::domain::summary::SummaryEntry;
use crate::domain::technical::IndicatorSnapshot;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReport;

#[derive(Serialize)]
struct RankingDocument<'a> {
    ticker: &'a str,
    ranking: &'a RankedEvaluation,
}

#[derive(Serialize)]
struct IndicatorDocument<'a> {
    snapshot: &'a IndicatorSnapshot,
    recommendation: Option<&'a TradeRecommendation>,
}

fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, StratbenchError> {
    serde_json::to_string_pretty(value).map_err(|e| StratbenchError::Report {
        reason: e.to_string(),
    })
}

impl ReportPort for JsonReport {
    fn render_ranking(
        &self,
        ticker: &str,
        ranking: &RankedEvaluation,
    ) -> Result<String, StratbenchError> {
        to_pretty(&RankingDocument { ticker, ranking })
    }

    fn render_result(&self, result: &BacktestResult) -> Result<String, StratbenchError> {
        to_pretty(result)
    }

    fn render_summary(&self, entries: &[SummaryEntry]) -> Result<String, StratbenchError> {
        to_pretty(entries)
    }

    fn render_plan(&self, plan: &TradePlan) -> Result<String, StratbenchError> {
        to_pretty(plan)
    }

    fn render_indicators(
        &self,
        snapshot: &IndicatorSnapshot,
        recommendation: Option<&TradeRecommendation>,
    ) -> Result<String, StratbenchError> {
        to_pretty(&IndicatorDocument {
            snapshot,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::BacktestEngine;
    use crate::domain::bar::BarSeries;
    use crate::domain::strategy::percentage::PercentageStrategy;
    use crate::domain::test_support::rising_bars;
    use serde_json::Value;

    #[test]
    fn result_serializes_with_lowercase_signal_and_uppercase_actions() {
        let series = BarSeries::new("AMC", rising_bars(30, 50.0, 1.0)).unwrap();
        let result = BacktestEngine::default().run(&PercentageStrategy::default(), &series);

        let value: Value = serde_json::from_str(&JsonReport.render_result(&result).unwrap()).unwrap();
        assert_eq!(value["strategy_name"], "PercentageStrategy");
        assert_eq!(value["final_signal"], "buy");
        assert_eq!(value["trade_log"][0]["action"], "BUY");
        assert!(value["equity_curve"].is_array());
    }

    #[test]
    fn empty_ranking_is_an_empty_array() {
        let text = JsonReport
            .render_ranking("AMC", &RankedEvaluation::default())
            .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["ticker"], "AMC");
        assert_eq!(value["ranking"], Value::Array(Vec::new()));
    }
}
