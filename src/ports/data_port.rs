//! Market data access port.

use crate::domain::bar::Bar;
use crate::domain::error::StratbenchError;

/// Source of daily bars for one ticker.
///
/// Implementations return bars sorted ascending by date covering the last
/// `lookback_days` calendar days, and an empty vector when the ticker has no
/// data.
pub trait DataPort: Send + Sync {
    fn fetch_bars(&self, ticker: &str, lookback_days: u32) -> Result<Vec<Bar>, StratbenchError>;
}
