//! Bar builders shared by the unit tests.

use chrono::{Duration, NaiveDate};

use crate::domain::bar::Bar;

pub fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset as i64)
}

/// Bars with open = high = low = close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: day(i),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
        })
        .collect()
}

/// Bars from (high, low, close) triples.
pub fn bars_from_hlc(hlc: &[(f64, f64, f64)]) -> Vec<Bar> {
    hlc.iter()
        .enumerate()
        .map(|(i, &(high, low, close))| Bar {
            date: day(i),
            open: close,
            high,
            low,
            close,
            volume: 1_000.0,
        })
        .collect()
}

/// `count` bars whose close rises by `step` each bar, with a one-unit range.
pub fn rising_bars(count: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let close = start + step * i as f64;
            Bar {
                date: day(i),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1_000.0,
            }
        })
        .collect()
}
