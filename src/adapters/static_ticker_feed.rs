//! Fixed ticker list from config or the command line.

use crate::domain::error::StratbenchError;
use crate::ports::ticker_feed_port::TickerFeed;

#[derive(Debug, Clone, PartialEq)]
pub struct StaticTickerFeed {
    name: String,
    tickers: Vec<String>,
}

impl StaticTickerFeed {
    pub fn new(name: impl Into<String>, tickers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            tickers,
        }
    }

    /// Parse a comma-separated list, skipping blanks.
    pub fn from_csv_list(name: impl Into<String>, list: &str) -> Self {
        let tickers = list
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(name, tickers)
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

impl TickerFeed for StaticTickerFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn tickers(&self, limit: usize) -> Result<Vec<String>, StratbenchError> {
        Ok(self.tickers.iter().take(limit).cloned().collect())
    }
}
