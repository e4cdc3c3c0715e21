//! Report rendering port.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::StratbenchError;
use crate::domain::evaluator::RankedEvaluation;
use crate::domain::planner::TradePlan;
use crate::domain::recommendation::TradeRecommendation;
use crate::domain::summary::SummaryEntry;
use crate::domain::technical::IndicatorSnapshot;

/// Renders result types into a printable document.
pub trait ReportPort {
    fn render_ranking(
        &self,
        ticker: &str,
        ranking: &RankedEvaluation,
    ) -> Result<String, StratbenchError>;

    fn render_result(&self, result: &BacktestResult) -> Result<String, StratbenchError>;

    fn render_summary(&self, entries: &[SummaryEntry]) -> Result<String, StratbenchError>;

    fn render_plan(&self, plan: &TradePlan) -> Result<String, StratbenchError>;

    fn render_indicators(
        &self,
        snapshot: &IndicatorSnapshot,
        recommendation: Option<&TradeRecommendation>,
    ) -> Result<String, StratbenchError>;
}
