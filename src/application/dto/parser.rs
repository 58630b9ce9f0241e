// src/application/dto/parser.rs
// Turns chart payloads into price bars

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use super::{ChartEnvelope, ChartResult, Quote};
use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::PriceBar;

/// Error code the chart endpoint uses for tickers it does not know.
const NOT_FOUND_CODE: &str = "Not Found";

/// Parse a chart payload into bars, in payload order.
///
/// An unknown ticker or a payload without rows yields an empty vec. Rows with
/// every price null are skipped; a row with only some prices null is a
/// `MalformedRow` error. With `adjusted`, prices are rescaled so that close
/// equals the adjusted close.
pub fn parse_chart(symbol: &str, body: &[u8], adjusted: bool) -> ProviderResult<Vec<PriceBar>> {
    let envelope: ChartEnvelope = serde_json::from_slice(body)?;

    if let Some(error) = envelope.chart.error {
        if error.code == NOT_FOUND_CODE {
            log::debug!("{} not known to provider: {:?}", symbol, error.description);
            return Ok(Vec::new());
        }
        return Err(ProviderError::Api(format!(
            "{}: {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    match envelope.chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => parse_result(symbol, &result, adjusted),
        None => Ok(Vec::new()),
    }
}

fn parse_result(symbol: &str, result: &ChartResult, adjusted: bool) -> ProviderResult<Vec<PriceBar>> {
    if result.timestamp.is_empty() {
        return Ok(Vec::new());
    }

    let quote = result.indicators.quote.first().ok_or_else(|| {
        ProviderError::Parse(format!("{} has timestamps but no quote block", symbol))
    })?;
    let adjclose = if adjusted {
        let column = result.indicators.adjclose.first().map(|a| a.adjclose.as_slice());
        if column.is_none() {
            log::debug!("{} has no adjusted closes; using raw prices", symbol);
        }
        column
    } else {
        None
    };

    let zone = exchange_zone(symbol, result.meta.exchange_timezone_name.as_deref());

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (index, ts) in result.timestamp.iter().enumerate() {
        let Some(raw) = RawRow::at(quote, index) else {
            continue;
        };

        let missing = |field: &'static str| ProviderError::MalformedRow {
            symbol: symbol.to_string(),
            index,
            field,
        };

        let open = raw.open.ok_or_else(|| missing("open"))?;
        let high = raw.high.ok_or_else(|| missing("high"))?;
        let low = raw.low.ok_or_else(|| missing("low"))?;
        let close = raw.close.ok_or_else(|| missing("close"))?;
        let volume = raw.volume.ok_or_else(|| missing("volume"))?;

        let (ratio, close) = match adjclose {
            Some(column) => {
                let adj = column
                    .get(index)
                    .copied()
                    .flatten()
                    .ok_or_else(|| missing("adjclose"))?;
                let ratio = if close != 0.0 { adj / close } else { 1.0 };
                (ratio, adj)
            }
            None => (1.0, close),
        };

        bars.push(PriceBar {
            date: trading_date(*ts, zone, result.meta.gmtoffset)?,
            open: open * ratio,
            high: high * ratio,
            low: low * ratio,
            close,
            volume: volume.max(0.0).round() as u64,
        });
    }

    Ok(bars)
}

/// Calendar date of a bar in the exchange's time zone.
///
/// `gmtoffset` is the offset when the chart was fetched, so it is only used
/// when the zone is unknown; with a zone each bar gets the offset in force on
/// its own date.
pub fn trading_date(timestamp: i64, zone: Option<Tz>, gmtoffset: i64) -> ProviderResult<NaiveDate> {
    let invalid = || ProviderError::Parse(format!("Invalid timestamp: {}", timestamp));
    match zone {
        Some(tz) => DateTime::from_timestamp(timestamp, 0)
            .map(|utc| utc.with_timezone(&tz).date_naive())
            .ok_or_else(invalid),
        None => DateTime::from_timestamp(timestamp + gmtoffset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(invalid),
    }
}

fn exchange_zone(symbol: &str, name: Option<&str>) -> Option<Tz> {
    let name = name?;
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            log::debug!("{}: unknown exchange time zone {}; using gmtoffset", symbol, name);
            None
        }
    }
}

struct RawRow {
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl RawRow {
    /// `None` when the row carries no prices at all.
    fn at(quote: &Quote, index: usize) -> Option<Self> {
        let cell = |column: &[Option<f64>]| column.get(index).copied().flatten();
        let row = Self {
            open: cell(&quote.open),
            high: cell(&quote.high),
            low: cell(&quote.low),
            close: cell(&quote.close),
            volume: cell(&quote.volume),
        };

        let no_prices =
            row.open.is_none() && row.high.is_none() && row.low.is_none() && row.close.is_none();
        if no_prices {
            None
        } else {
            Some(row)
        }
    }
}
