//! Summary statistics over a finished backtest.

use serde::Serialize;

use super::decision::round2;
use super::portfolio::{EquityPoint, RoundTrip};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BacktestMetrics {
    /// Final value over initial cash, in percent.
    pub return_pct: f64,
    /// Largest peak-to-trough decline of the equity curve, as a fraction.
    pub max_drawdown: f64,
    pub round_trips: usize,
    /// Share of round trips closed with a positive pnl.
    pub win_rate: f64,
}

impl BacktestMetrics {
    pub fn compute(initial_cash: f64, equity_curve: &[EquityPoint], trips: &[RoundTrip]) -> Self {
        let final_value = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(initial_cash);

        let return_pct = if initial_cash > 0.0 {
            round2((final_value - initial_cash) / initial_cash * 100.0)
        } else {
            0.0
        };

        let wins = trips.iter().filter(|t| t.pnl > 0.0).count();
        let win_rate = if trips.is_empty() {
            0.0
        } else {
            wins as f64 / trips.len() as f64
        };

        BacktestMetrics {
            return_pct,
            max_drawdown: compute_drawdown(equity_curve),
            round_trips: trips.len(),
            win_rate,
        }
    }
}

fn compute_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let Some(first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;
    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - point.equity) / peak);
        }
    }
    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::day;
    use approx::assert_relative_eq;

    fn curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquityPoint { date: day(i), equity })
            .collect()
    }

    fn trip(pnl: f64) -> RoundTrip {
        RoundTrip {
            entry_date: day(0),
            exit_date: day(1),
            entry_price: 100.0,
            exit_price: 100.0 + pnl,
            pnl,
        }
    }

    #[test]
    fn metrics_empty_curve() {
        let m = BacktestMetrics::compute(10_000.0, &[], &[]);
        assert_eq!(m, BacktestMetrics::default());
    }

    #[test]
    fn metrics_return_pct() {
        let m = BacktestMetrics::compute(10_000.0, &curve(&[10_000.0, 11_250.0]), &[]);
        assert_relative_eq!(m.return_pct, 12.5);
    }

    #[test]
    fn metrics_max_drawdown() {
        let m = BacktestMetrics::compute(
            100.0,
            &curve(&[100.0, 120.0, 90.0, 110.0, 130.0, 117.0]),
            &[],
        );
        assert_relative_eq!(m.max_drawdown, 0.25);
    }

    #[test]
    fn metrics_monotonic_curve_has_no_drawdown() {
        let m = BacktestMetrics::compute(100.0, &curve(&[100.0, 101.0, 102.0]), &[]);
        assert_eq!(m.max_drawdown, 0.0);
    }

    #[test]
    fn metrics_win_rate() {
        let trips = [trip(5.0), trip(-2.0), trip(0.0), trip(1.0)];
        let m = BacktestMetrics::compute(100.0, &curve(&[100.0]), &trips);
        assert_eq!(m.round_trips, 4);
        assert_relative_eq!(m.win_rate, 0.5);
    }
}
