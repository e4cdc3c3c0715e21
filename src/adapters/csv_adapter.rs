//! CSV file data adapter.
//!
//! One file per ticker, `{base_path}/{TICKER}.csv`. The header row is mapped
//! once onto the canonical bar schema, so both long headers
//! (`date,open,high,low,close,volume`) and short aggregate-style headers
//! (`t,o,h,l,c,v` with `t` in epoch milliseconds) are accepted in any column
//! order.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use crate::domain::bar::Bar;
use crate::domain::error::StratbenchError;
use crate::ports::data_port::DataPort;
use crate::ports::ticker_feed_port::TickerFeed;

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DateFormat {
    Iso,
    EpochMillis,
}

/// Column positions resolved from the header row.
#[derive(Debug)]
struct ColumnMap {
    date: usize,
    date_format: DateFormat,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, String> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
        };

        let (date, date_format) = match (find(&["date"]), find(&["t", "timestamp"])) {
            (Some(i), _) => (i, DateFormat::Iso),
            (None, Some(i)) => (i, DateFormat::EpochMillis),
            (None, None) => return Err("missing date column".into()),
        };
        let required = |name: &str, aliases: &[&str]| {
            find(aliases).ok_or_else(|| format!("missing {name} column"))
        };

        Ok(ColumnMap {
            date,
            date_format,
            open: required("open", &["open", "o"])?,
            high: required("high", &["high", "h"])?,
            low: required("low", &["low", "l"])?,
            close: required("close", &["close", "c"])?,
            volume: find(&["volume", "v"]),
        })
    }

    fn parse(&self, record: &csv::StringRecord) -> Result<Bar, String> {
        let field = |index: usize, name: &str| {
            record
                .get(index)
                .map(str::trim)
                .ok_or_else(|| format!("missing {name} value"))
        };
        let number = |index: usize, name: &str| -> Result<f64, String> {
            let raw = field(index, name)?;
            raw.parse::<f64>()
                .map_err(|e| format!("invalid {name} value '{raw}': {e}"))
        };

        let raw_date = field(self.date, "date")?;
        let date = match self.date_format {
            DateFormat::Iso => NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
                .map_err(|e| format!("invalid date '{raw_date}': {e}"))?,
            DateFormat::EpochMillis => raw_date
                .parse::<i64>()
                .ok()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| format!("invalid timestamp '{raw_date}'"))?,
        };

        Ok(Bar {
            date,
            open: number(self.open, "open")?,
            high: number(self.high, "high")?,
            low: number(self.low, "low")?,
            close: number(self.close, "close")?,
            volume: match self.volume {
                Some(index) => number(index, "volume")?,
                None => 0.0,
            },
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }

    /// Tickers with a CSV file in the base directory, sorted.
    pub fn list_tickers(&self) -> Result<Vec<String>, StratbenchError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StratbenchError::DataFetch {
            ticker: "*".into(),
            reason: format!("failed to read directory {}: {}", self.base_path.display(), e),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StratbenchError::DataFetch {
                ticker: "*".into(),
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
                if let Some(stem) = path.file_stem() {
                    tickers.push(stem.to_string_lossy().to_uppercase());
                }
            }
        }
        tickers.sort();
        Ok(tickers)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, ticker: &str, lookback_days: u32) -> Result<Vec<Bar>, StratbenchError> {
        let fetch_err = |reason: String| StratbenchError::DataFetch {
            ticker: ticker.to_string(),
            reason,
        };

        let path = self.csv_path(ticker);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(ticker, path = %path.display(), "no data file");
                return Ok(Vec::new());
            }
            Err(e) => return Err(fetch_err(format!("failed to read {}: {}", path.display(), e))),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| fetch_err(format!("CSV header error: {}", e)))?
            .clone();
        let columns = ColumnMap::from_headers(&headers).map_err(fetch_err)?;

        let mut bars = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| fetch_err(format!("CSV parse error: {}", e)))?;
            let bar = columns
                .parse(&record)
                .map_err(|reason| fetch_err(format!("row {}: {}", line + 1, reason)))?;
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date);
        if let Some(dup) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(fetch_err(format!("duplicate bar on {}", dup[1].date)));
        }

        // A lookback reaching past the calendar range keeps every bar.
        let cutoff = bars.last().and_then(|b| {
            Duration::try_days(i64::from(lookback_days)).and_then(|d| b.date.checked_sub_signed(d))
        });
        if let Some(cutoff) = cutoff {
            bars.retain(|b| b.date > cutoff);
        }
        debug!(ticker, bars = bars.len(), lookback_days, "loaded bars");
        Ok(bars)
    }
}

impl TickerFeed for CsvAdapter {
    fn name(&self) -> &str {
        "csv-directory"
    }

    fn tickers(&self, limit: usize) -> Result<Vec<String>, StratbenchError> {
        let mut tickers = self.list_tickers()?;
        tickers.truncate(limit);
        Ok(tickers)
    }
}
