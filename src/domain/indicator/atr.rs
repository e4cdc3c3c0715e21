//! ATR (Average True Range).
//!
//! TR[i] = max(H[i] - L[i], |H[i] - C[i-1]|, |L[i] - C[i-1]|) for i >= 1.
//! ATR(n)[i] = mean(TR[i-n+1..=i]), a plain trailing mean.
//! Warmup: the first n bars are invalid (n true ranges need n+1 bars).

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[Bar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::empty(IndicatorType::Atr(period));
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut window_sum = 0.0;
    let mut tr_values: Vec<f64> = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            values.push(IndicatorPoint::invalid(bar.date, IndicatorValue::UNDEFINED));
            continue;
        }

        let tr = bar.true_range(bars[i - 1].close);
        tr_values.push(tr);
        window_sum += tr;
        if tr_values.len() > period {
            window_sum -= tr_values[tr_values.len() - 1 - period];
        }

        if tr_values.len() >= period {
            values.push(IndicatorPoint::simple(bar.date, window_sum / period as f64));
        } else {
            values.push(IndicatorPoint::invalid(bar.date, IndicatorValue::UNDEFINED));
        }
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values,
    }
}
