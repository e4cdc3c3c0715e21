//! Stochastic oscillator %K.
//!
//! %K(n)[i] = 100 * (C[i] - LL) / (HH - LL) where LL/HH are the lowest low and
//! highest high over bars i-n+1..=i.
//! HH == LL is a division fault: the point is left undefined.
//! Warmup: first (n-1) bars invalid.

use crate::domain::bar::Bar;
use crate::domain::error::IndicatorError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub const DEFAULT_WINDOW: usize = 14;

/// %K of the newest bar in `window`.
pub fn stochastic_k(window: &[Bar]) -> Result<f64, IndicatorError> {
    let last = window.last().ok_or(IndicatorError::DivisionUndefined)?;
    let lowest_low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let highest_high = window
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);

    let range = highest_high - lowest_low;
    if range == 0.0 {
        return Err(IndicatorError::DivisionUndefined);
    }
    Ok(100.0 * (last.close - lowest_low) / range)
}

pub fn calculate_stochastic(bars: &[Bar], window: usize) -> IndicatorSeries {
    if window == 0 {
        return IndicatorSeries::empty(IndicatorType::Stochastic(window));
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i + 1 < window {
                return IndicatorPoint::invalid(bar.date, IndicatorValue::UNDEFINED);
            }
            match stochastic_k(&bars[i + 1 - window..=i]) {
                Ok(k) => IndicatorPoint::simple(bar.date, k),
                Err(IndicatorError::DivisionUndefined) => {
                    IndicatorPoint::invalid(bar.date, IndicatorValue::UNDEFINED)
                }
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stochastic(window),
        values,
    }
}
