//! Plain-text report adapter: aligned tables for terminal output.

use crate::domain::backtest::{BacktestResult, TradeLogEntry};
use crate::domain::error::StratbenchError;
use crate::domain::evaluator::RankedEvaluation;
use crate::domain::planner::TradePlan;
use crate::domain::recommendation::TradeRecommendation;
use crate::domain::summary::SummaryEntry;
use crate::domain::technical::IndicatorSnapshot;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

fn opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn format_trade_log(trades: &[TradeLogEntry]) -> String {
    if trades.is_empty() {
        return "No trades executed.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:>4}  {:<10}  {:<4}  {:>10}  {:>10}  {:>10}\n",
        "#", "Date", "Side", "Price", "Stop", "Take"
    ));
    for (i, trade) in trades.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<10}  {:<4}  {:>10.2}  {:>10}  {:>10}\n",
            i + 1,
            trade.date.format("%Y-%m-%d"),
            format!("{:?}", trade.action).to_uppercase(),
            trade.price,
            opt(trade.stop_loss),
            opt(trade.take_profit),
        ));
    }
    out
}

impl ReportPort for TextReport {
    fn render_ranking(
        &self,
        ticker: &str,
        ranking: &RankedEvaluation,
    ) -> Result<String, StratbenchError> {
        let mut out = format!("Strategy ranking for {ticker}\n");
        if ranking.is_empty() {
            out.push_str("No strategies could be evaluated.\n");
            return Ok(out);
        }

        out.push_str(&format!(
            "{:>4}  {:<24}  {:<6}  {:>10}  {:>12}  {:>8}  {:>8}\n",
            "Rank", "Strategy", "Signal", "Price", "Return", "Trades", "MaxDD"
        ));
        for (i, entry) in ranking.iter().enumerate() {
            let r = &entry.result;
            out.push_str(&format!(
                "{:>4}  {:<24}  {:<6}  {:>10}  {:>12.2}  {:>8}  {:>7.1}%\n",
                i + 1,
                entry.strategy_name,
                r.final_signal.to_string(),
                opt(r.final_price),
                r.total_return,
                r.trade_log.len(),
                r.metrics.max_drawdown * 100.0,
            ));
        }
        Ok(out)
    }

    fn render_result(&self, result: &BacktestResult) -> Result<String, StratbenchError> {
        let mut out = String::new();
        out.push_str(&format!("{} on {}\n", result.strategy_name, result.ticker));
        out.push_str(&format!("  Final signal:    {}\n", result.final_signal));
        out.push_str(&format!("  Final price:     {}\n", opt(result.final_price)));
        out.push_str(&format!("  Stop loss:       {}\n", opt(result.stop_loss)));
        out.push_str(&format!("  Take profit:     {}\n", opt(result.take_profit)));
        out.push_str(&format!("  Expected profit: {:.2}\n", result.expected_profit));
        out.push_str(&format!("  Expected loss:   {:.2}\n", result.expected_loss));
        out.push_str(&format!("  Total return:    {:.2}\n", result.total_return));
        out.push_str(&format!("  Final value:     {:.2}\n", result.final_value));
        out.push_str(&format!(
            "  Return:          {:+.2}%  max drawdown {:.1}%  win rate {:.0}% over {} round trips\n\n",
            result.metrics.return_pct,
            result.metrics.max_drawdown * 100.0,
            result.metrics.win_rate * 100.0,
            result.metrics.round_trips,
        ));
        out.push_str(&format_trade_log(&result.trade_log));
        Ok(out)
    }

    fn render_summary(&self, entries: &[SummaryEntry]) -> Result<String, StratbenchError> {
        if entries.is_empty() {
            return Ok("No tickers produced a ranking.\n".to_string());
        }

        let mut out = String::new();
        out.push_str(&format!(
            "{:<8}  {:<24}  {:<6}  {:>10}  {:>10}  {:>10}  {:>12}\n",
            "Ticker", "Strategy", "Signal", "Price", "Stop", "Take", "Return"
        ));
        for entry in entries {
            out.push_str(&format!(
                "{:<8}  {:<24}  {:<6}  {:>10}  {:>10}  {:>10}  {:>12}\n",
                entry.ticker,
                entry.strategy_name,
                entry.signal.to_string(),
                opt(entry.price),
                opt(entry.stop_loss),
                opt(entry.take_profit),
                opt(entry.total_return),
            ));
        }
        Ok(out)
    }

    fn render_plan(&self, plan: &TradePlan) -> Result<String, StratbenchError> {
        let d = &plan.decision;
        let mut out = format!("Trade plan for {}\n", plan.ticker);
        out.push_str(&format!("  Strategy:        {} ({})\n", plan.strategy_name, plan.strategy));
        out.push_str(&format!("  Reason:          {}\n", plan.reason));
        out.push_str(&format!("  Signal:          {}\n", d.signal));
        out.push_str(&format!("  Price:           {}\n", opt(d.price)));
        out.push_str(&format!("  Stop loss:       {}\n", opt(d.stop_loss)));
        out.push_str(&format!("  Take profit:     {}\n", opt(d.take_profit)));
        out.push_str(&format!("  Expected profit: {:.2}\n", d.expected_profit));
        out.push_str(&format!("  Expected loss:   {:.2}\n", d.expected_loss));
        Ok(out)
    }

    fn render_indicators(
        &self,
        snapshot: &IndicatorSnapshot,
        recommendation: Option<&TradeRecommendation>,
    ) -> Result<String, StratbenchError> {
        let s = snapshot;
        let mut out = format!("Indicators for {} on {}\n", s.ticker, s.date.format("%Y-%m-%d"));
        out.push_str(&format!("  Price:       {:.2}\n", s.market_price));
        out.push_str(&format!(
            "  MACD:        {} / {}  ({:+})\n",
            opt(s.macd),
            opt(s.macd_signal),
            s.scores.macd
        ));
        out.push_str(&format!("  RSI:         {}  ({:+})\n", opt(s.rsi), s.scores.rsi));
        out.push_str(&format!(
            "  Stochastic:  {}  ({:+})\n",
            opt(s.stochastic),
            s.scores.stochastic
        ));
        out.push_str(&format!("  ROC %:       {}  ({:+})\n", opt(s.roc_pct), s.scores.roc));
        out.push_str(&format!("  ATR:         {}\n", opt(s.atr)));
        out.push_str(&format!(
            "  Composite:   {} ({:+.1})\n",
            s.signal,
            s.scores.weighted_sum()
        ));

        if let Some(rec) = recommendation {
            out.push_str(&format!("\nRecommendation: {}\n", rec.kind));
            out.push_str(&format!("  Entry:           {:.2}\n", rec.entry_price));
            out.push_str(&format!("  Take profit:     {:.2}\n", rec.take_profit));
            out.push_str(&format!("  Stop loss:       {:.2}\n", rec.stop_loss));
            out.push_str(&format!("  Expected profit: {:.2}\n", rec.expected_profit));
            out.push_str(&format!("  Expected loss:   {:.2}\n", rec.expected_loss));
        }
        Ok(out)
    }
}
