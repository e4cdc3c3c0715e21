//! ROC (Rate of Change) indicator.
//!
//! ROC(w)[i] = C[i] / C[i-w+1] - 1, i.e. latest over earliest close in a
//! window of `w` bars, as a fraction (0.05 = +5%).
//! If the earliest close is 0 the value is undefined.
//! Warmup: first (w-1) bars invalid.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_roc(bars: &[Bar], window: usize) -> IndicatorSeries {
    if window < 2 {
        return IndicatorSeries::empty(IndicatorType::Roc(window));
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i + 1 < window {
                IndicatorPoint::invalid(bar.date, IndicatorValue::UNDEFINED)
            } else {
                let earliest = bars[i + 1 - window].close;
                IndicatorPoint::simple(bar.date, ratio_change(bar.close, earliest))
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Roc(window),
        values,
    }
}

/// Rate of change of the newest `window` bars, `None` when fewer bars are
/// available or the earliest close is zero.
pub fn rate_of_change(bars: &[Bar], window: usize) -> Option<f64> {
    if window < 2 || bars.len() < window {
        return None;
    }
    let latest = bars[bars.len() - 1].close;
    let earliest = bars[bars.len() - window].close;
    Some(ratio_change(latest, earliest)).filter(|v| v.is_finite())
}

fn ratio_change(latest: f64, earliest: f64) -> f64 {
    if earliest == 0.0 {
        f64::NAN
    } else {
        latest / earliest - 1.0
    }
}
