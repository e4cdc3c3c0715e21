//! Ticker universe feeds (top movers, social mentions, watch lists).

use crate::domain::error::StratbenchError;

pub trait TickerFeed: Send + Sync {
    /// Label used in logs.
    fn name(&self) -> &str;

    /// Up to `limit` tickers, most relevant first.
    fn tickers(&self, limit: usize) -> Result<Vec<String>, StratbenchError>;
}
