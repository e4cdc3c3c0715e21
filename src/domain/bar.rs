//! OHLCV bar and the validated bar series handed to the simulation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::StratbenchError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Closing prices of a bar slice, oldest first.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Ordered bars for one ticker.
///
/// Construction enforces strictly ascending dates and a positive, finite close
/// on every bar. Once built the series is immutable; strategies only ever see
/// `&[Bar]` prefixes of it.
#[derive(Debug, Clone)]
pub struct BarSeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<Bar>) -> Result<Self, StratbenchError> {
        let ticker = ticker.into();

        for (i, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(StratbenchError::InvalidSeries {
                    ticker,
                    reason: format!("non-positive close {} on {}", bar.close, bar.date),
                });
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                let reason = if bars[i - 1].date == bar.date {
                    format!("duplicate bar on {}", bar.date)
                } else {
                    format!("bar on {} is out of order", bar.date)
                };
                return Err(StratbenchError::InvalidSeries { ticker, reason });
            }
        }

        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars `0..=index`, the view a strategy sees when evaluating bar `index`.
    pub fn prefix(&self, index: usize) -> &[Bar] {
        &self.bars[..=index.min(self.bars.len().saturating_sub(1))]
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000.0,
        }
    }

    #[test]
    fn true_range_hl_dominates() {
        let b = Bar {
            high: 110.0,
            low: 90.0,
            ..bar(1, 105.0)
        };
        assert!((b.true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let b = Bar {
            high: 110.0,
            low: 90.0,
            ..bar(1, 105.0)
        };
        // |110 - 70| = 40
        assert!((b.true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        let b = Bar {
            high: 110.0,
            low: 90.0,
            ..bar(1, 105.0)
        };
        // |90 - 130| = 40
        assert!((b.true_range(130.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn series_accepts_ascending_bars() {
        let series = BarSeries::new("AMC", vec![bar(1, 10.0), bar(2, 11.0), bar(3, 12.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.ticker(), "AMC");
        assert_eq!(series.prefix(1).len(), 2);
        assert_eq!(series.last().unwrap().close, 12.0);
    }

    #[test]
    fn series_accepts_empty() {
        let series = BarSeries::new("AMC", vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.prefix(0).is_empty());
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let err = BarSeries::new("AMC", vec![bar(1, 10.0), bar(1, 11.0)]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn series_rejects_out_of_order() {
        let err = BarSeries::new("AMC", vec![bar(2, 10.0), bar(1, 11.0)]).unwrap_err();
        assert!(err.to_string().contains("out of order"));
    }

    #[test]
    fn series_rejects_non_positive_close() {
        let err = BarSeries::new("AMC", vec![bar(1, 10.0), bar(2, 0.0)]).unwrap_err();
        assert!(matches!(err, StratbenchError::InvalidSeries { .. }));
    }

    #[test]
    fn closes_in_order() {
        assert_eq!(closes(&[bar(1, 1.0), bar(2, 2.0)]), vec![1.0, 2.0]);
    }
}
