//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::bar::Bar;
use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, calculate_sma,
};

pub fn calculate_bollinger(bars: &[Bar], period: usize, multiplier: f64) -> IndicatorSeries {
    let indicator_type = IndicatorType::Bollinger { period, multiplier };
    if period < 2 {
        return IndicatorSeries::empty(indicator_type);
    }

    let sma = calculate_sma(bars, period);
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let Some(middle) = sma.simple_at(i) else {
                return IndicatorPoint::invalid(
                    bar.date,
                    IndicatorValue::Bollinger {
                        upper: f64::NAN,
                        middle: f64::NAN,
                        lower: f64::NAN,
                    },
                );
            };

            let window = &bars[i + 1 - period..=i];
            let variance = window
                .iter()
                .map(|b| {
                    let diff = b.close - middle;
                    diff * diff
                })
                .sum::<f64>()
                / (period - 1) as f64;
            let stddev = variance.sqrt();

            IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Bollinger {
                    upper: middle + multiplier * stddev,
                    middle,
                    lower: middle - multiplier * stddev,
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
