// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use price_dashboard::domain::errors::{ProviderError, ProviderResult};
use price_dashboard::domain::models::{PriceBar, PriceSeries};
use price_dashboard::domain::repository::PriceProvider;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekday bars with closes 100, 101, 102, ... inside `[start, end)`.
pub fn weekday_bars(start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
    use chrono::Datelike;

    let mut bars = Vec::new();
    let mut day = start;
    let mut close = 100.0;
    while day < end {
        if day.weekday().number_from_monday() <= 5 {
            bars.push(PriceBar {
                date: day,
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000_000,
            });
            close += 1.0;
        }
        day += Duration::days(1);
    }
    bars
}

/// In-memory provider that counts calls per symbol.
///
/// Known symbols get weekday bars; symbols in `failing` get a transport error;
/// everything else is treated as an unknown ticker.
pub struct StubProvider {
    known: Vec<String>,
    failing: Vec<String>,
    delay: Option<std::time::Duration>,
    calls: AtomicUsize,
    per_symbol: Mutex<HashMap<String, usize>>,
}

impl StubProvider {
    pub fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|s| s.to_string()).collect(),
            failing: Vec::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            per_symbol: Mutex::new(HashMap::new()),
        }
    }

    pub fn failing(mut self, symbols: &[&str]) -> Self {
        self.failing = symbols.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, symbol: &str) -> usize {
        self.per_symbol
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl PriceProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<PriceSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .per_symbol
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.iter().any(|s| s == symbol) {
            return Err(ProviderError::Request("connection reset by peer".into()));
        }
        if self.known.iter().any(|s| s == symbol) {
            // newest first, the way some feeds deliver it
            let mut bars = weekday_bars(start, end);
            bars.reverse();
            return Ok(PriceSeries::from_bars(symbol, bars));
        }
        Ok(PriceSeries::empty(symbol))
    }
}
