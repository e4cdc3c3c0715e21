//! Simulation-local portfolio state for a single backtest run.
//!
//! The account is either all cash or fully invested in one long position,
//! never both: opening converts all cash to units, closing converts all units
//! back to cash.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// A position that was opened and later closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTrip {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub position_size: f64,
    pub entry_price: Option<f64>,
    entry_date: Option<NaiveDate>,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        PortfolioState {
            cash: initial_cash,
            position_size: 0.0,
            entry_price: None,
            entry_date: None,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position_size == 0.0
    }

    /// Convert all cash into units at `price`. Returns false (no change) when
    /// already invested, out of cash, or the price is unusable.
    pub fn open_long(&mut self, price: f64, date: NaiveDate) -> bool {
        if !self.is_flat() || self.cash <= 0.0 || !(price > 0.0 && price.is_finite()) {
            return false;
        }
        self.position_size = self.cash / price;
        self.cash = 0.0;
        self.entry_price = Some(price);
        self.entry_date = Some(date);
        true
    }

    /// Convert all units back into cash at `price`.
    pub fn close_long(&mut self, price: f64, date: NaiveDate) -> Option<RoundTrip> {
        if self.is_flat() {
            return None;
        }
        let entry_price = self.entry_price.take()?;
        let entry_date = self.entry_date.take()?;
        let units = self.position_size;

        self.cash = units * price;
        self.position_size = 0.0;

        Some(RoundTrip {
            entry_date,
            exit_date: date,
            entry_price,
            exit_price: price,
            pnl: units * (price - entry_price),
        })
    }

    /// Cash plus the position marked at `price`.
    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.position_size * price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::day;
    use approx::assert_relative_eq;

    #[test]
    fn new_state_is_flat_cash() {
        let state = PortfolioState::new(10_000.0);
        assert!(state.is_flat());
        assert_eq!(state.cash, 10_000.0);
        assert_eq!(state.entry_price, None);
        assert_eq!(state.total_value(123.0), 10_000.0);
    }

    #[test]
    fn open_long_invests_all_cash() {
        let mut state = PortfolioState::new(10_000.0);
        assert!(state.open_long(100.0, day(0)));

        assert_eq!(state.cash, 0.0);
        assert_relative_eq!(state.position_size, 100.0);
        assert_eq!(state.entry_price, Some(100.0));
        assert_relative_eq!(state.total_value(110.0), 11_000.0);
    }

    #[test]
    fn open_long_twice_is_ignored() {
        let mut state = PortfolioState::new(10_000.0);
        assert!(state.open_long(100.0, day(0)));
        assert!(!state.open_long(50.0, day(1)));
        assert_eq!(state.entry_price, Some(100.0));
    }

    #[test]
    fn open_long_rejects_bad_price() {
        let mut state = PortfolioState::new(10_000.0);
        assert!(!state.open_long(0.0, day(0)));
        assert!(!state.open_long(f64::NAN, day(0)));
        assert!(state.is_flat());
    }

    #[test]
    fn close_long_realises_pnl() {
        let mut state = PortfolioState::new(10_000.0);
        state.open_long(100.0, day(0));
        let trip = state.close_long(90.0, day(3)).unwrap();

        assert!(state.is_flat());
        assert_relative_eq!(state.cash, 9_000.0);
        assert_relative_eq!(trip.pnl, -1_000.0);
        assert_eq!(trip.entry_date, day(0));
        assert_eq!(trip.exit_date, day(3));
        assert_eq!(state.entry_price, None);
    }

    #[test]
    fn close_long_when_flat_is_none() {
        let mut state = PortfolioState::new(10_000.0);
        assert!(state.close_long(100.0, day(0)).is_none());
        assert_eq!(state.cash, 10_000.0);
    }
}
