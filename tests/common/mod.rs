#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use stratbench::domain::bar::Bar;
use stratbench::domain::error::StratbenchError;
use stratbench::ports::data_port::DataPort;
use std::collections::HashMap;
use std::io::Write;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, ticker: &str, _lookback_days: u32) -> Result<Vec<Bar>, StratbenchError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(StratbenchError::DataFetch {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset as i64)
}

pub fn make_bar(offset: usize, close: f64) -> Bar {
    Bar {
        date: day(offset),
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume: 1_000.0,
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i, close))
        .collect()
}

/// Constant close with no intrabar range.
pub fn flat_bars(count: usize, price: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| Bar {
            high: price,
            low: price,
            ..make_bar(i, price)
        })
        .collect()
}

/// Close rises by `step` every bar.
pub fn rising_bars(count: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| make_bar(i, start + step * i as f64))
        .collect()
}

/// Smooth up-and-down swings around `base`.
pub fn oscillating_bars(count: usize, base: f64, amplitude: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| make_bar(i, base + amplitude * (i as f64 * 0.4).sin()))
        .collect()
}

/// Write bars as a long-header CSV file named `{ticker}.csv` under `dir`.
pub fn write_csv(dir: &std::path::Path, ticker: &str, bars: &[Bar]) {
    let mut file = std::fs::File::create(dir.join(format!("{ticker}.csv"))).unwrap();
    writeln!(file, "date,open,high,low,close,volume").unwrap();
    for bar in bars {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        )
        .unwrap();
    }
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
