// src/analysis/indicators.rs
use ta::indicators::SimpleMovingAverage;
use ta::Next;

use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{FetchResult, MovingAveragePoint, MovingAverageSeries, PriceSeries};

pub const DEFAULT_MA_WINDOW: usize = 30;

/// Trailing simple moving average of the close price.
///
/// The output has one point per bar of `series`, on the same dates. A point is
/// `None` until `window` bars are available, then the mean close of the last
/// `window` bars including the current one. The input is only read.
pub fn derive_ma(series: &PriceSeries, window: usize) -> AnalysisResult<MovingAverageSeries> {
    let mut sma = SimpleMovingAverage::new(window)
        .map_err(|_| AnalysisError::InvalidWindow(window))?;

    let points = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            // the indicator averages over a partial window while warming up
            let mean = sma.next(bar.close);
            MovingAveragePoint {
                date: bar.date,
                value: (i + 1 >= window).then_some(mean),
            }
        })
        .collect();

    Ok(MovingAverageSeries {
        symbol: series.symbol.clone(),
        window,
        points,
    })
}

/// Moving averages for every series in `result`, in selection order.
pub fn derive_moving_averages(
    result: &FetchResult,
    window: usize,
) -> AnalysisResult<Vec<MovingAverageSeries>> {
    result
        .iter()
        .map(|(_, series)| derive_ma(series, window))
        .collect()
}
