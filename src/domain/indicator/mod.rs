//! Technical indicator implementations.
//!
//! Every indicator is a pure function from a bar slice to an
//! [`IndicatorSeries`] holding one [`IndicatorPoint`] per input bar. Points
//! inside an indicator's warm-up, or where its math is undefined, are marked
//! `valid: false` and carry `NaN`. Consumers read the newest defined value via
//! [`IndicatorSeries::latest`], which turns undefined into `None`.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use atr::calculate_atr;
pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_default};
pub use roc::{calculate_roc, rate_of_change};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stochastic::calculate_stochastic;

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

impl IndicatorPoint {
    pub(crate) fn invalid(date: NaiveDate, value: IndicatorValue) -> Self {
        Self {
            date,
            valid: false,
            value,
        }
    }

    pub(crate) fn simple(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            valid: value.is_finite(),
            value: IndicatorValue::Simple(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

impl IndicatorValue {
    pub(crate) const UNDEFINED: IndicatorValue = IndicatorValue::Simple(f64::NAN);

    pub fn as_simple(&self) -> Option<f64> {
        match *self {
            IndicatorValue::Simple(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Roc(usize),
    Atr(usize),
    Stochastic(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        multiplier: f64,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub(crate) fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            values: Vec::new(),
        }
    }

    /// Value of the newest point, or `None` if the series is empty or that
    /// point is undefined.
    pub fn latest(&self) -> Option<IndicatorValue> {
        self.values
            .last()
            .filter(|p| p.valid)
            .map(|p| p.value)
    }

    pub fn latest_simple(&self) -> Option<f64> {
        self.latest().and_then(|v| v.as_simple())
    }

    /// Simple value at `index`, `None` when out of range or undefined.
    pub fn simple_at(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .and_then(|p| p.value.as_simple())
    }
}
