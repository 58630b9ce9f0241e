// src/domain/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::domain::errors::ProviderError;

/// One daily OHLCV record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily price history for a single symbol.
///
/// Bars are kept sorted by date with no duplicate dates. An empty series is a
/// normal value: it is what an unknown ticker or a holiday-only range yields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            bars: Vec::new(),
        }
    }

    /// Builds a series from rows in any order. When two rows share a date the
    /// later one in the input wins.
    pub fn from_bars(symbol: &str, mut bars: Vec<PriceBar>) -> Self {
        // stable sort keeps input order within a date, so reverse + dedup keeps the last one
        bars.reverse();
        bars.sort_by_key(|bar| bar.date);
        bars.dedup_by_key(|bar| bar.date);

        Self {
            symbol: symbol.to_string(),
            bars,
        }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn close_prices(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// The last `n` bars, oldest first.
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

/// What the user asked for on one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRequest {
    symbols: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SymbolRequest {
    /// Blank entries are dropped and repeated symbols keep only their first
    /// position. `start > end` is passed through untouched.
    pub fn new<I, S>(symbols: I, start: NaiveDate, end: NaiveDate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        Self {
            symbols,
            start,
            end,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn key(&self) -> RequestKey {
        RequestKey {
            symbols: self.symbols.iter().cloned().collect(),
            start: self.start,
            end: self.end,
        }
    }
}

/// Cache identity of a request: the symbol set plus both date bounds.
/// Selection order is not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub symbols: BTreeSet<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Per-symbol price series for one request.
///
/// Every requested symbol has an entry, even when its fetch failed; the error
/// for a failed symbol is kept alongside in `failures`. Iteration follows the
/// order the symbols were selected in.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    order: Vec<String>,
    series: HashMap<String, Arc<PriceSeries>>,
    failures: HashMap<String, ProviderError>,
}

impl FetchResult {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            series: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    pub fn insert(&mut self, series: PriceSeries) {
        let symbol = series.symbol.clone();
        if !self.series.contains_key(&symbol) {
            self.order.push(symbol.clone());
        }
        self.failures.remove(&symbol);
        self.series.insert(symbol, Arc::new(series));
    }

    /// Records a failed symbol: an empty series plus the error that caused it.
    pub fn insert_failure(&mut self, symbol: &str, error: ProviderError) {
        self.insert(PriceSeries::empty(symbol));
        self.failures.insert(symbol.to_string(), error);
    }

    pub fn get(&self, symbol: &str) -> Option<&Arc<PriceSeries>> {
        self.series.get(symbol)
    }

    pub fn failure(&self, symbol: &str) -> Option<&ProviderError> {
        self.failures.get(symbol)
    }

    pub fn symbols(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(symbol, series)` pairs in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<PriceSeries>)> {
        self.order
            .iter()
            .filter_map(move |symbol| self.series.get(symbol).map(|s| (symbol.as_str(), s)))
    }

    /// Failed symbols and their errors, in selection order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ProviderError)> {
        self.order
            .iter()
            .filter_map(move |symbol| self.failures.get(symbol).map(|e| (symbol.as_str(), e)))
    }

    /// True when every symbol failed at the transport level, i.e. the
    /// provider could not be reached at all.
    pub fn provider_unavailable(&self) -> bool {
        !self.order.is_empty()
            && self
                .order
                .iter()
                .all(|s| self.failures.get(s).map_or(false, ProviderError::is_transport))
    }

    /// Same entries, iterated in `order`. Symbols missing from `order` are
    /// dropped; the series themselves are shared, not copied.
    pub fn reordered(&self, order: &[String]) -> Self {
        let order: Vec<String> = order
            .iter()
            .filter(|s| self.series.contains_key(*s))
            .cloned()
            .collect();

        let series = order
            .iter()
            .filter_map(|s| self.series.get(s).map(|v| (s.clone(), Arc::clone(v))))
            .collect();
        let failures = order
            .iter()
            .filter_map(|s| self.failures.get(s).map(|e| (s.clone(), e.clone())))
            .collect();

        Self {
            order,
            series,
            failures,
        }
    }
}

impl Default for FetchResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A moving-average value aligned with one bar of the source series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAveragePoint {
    pub date: NaiveDate,
    /// `None` until the window has filled.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSeries {
    pub symbol: String,
    pub window: usize,
    pub points: Vec<MovingAveragePoint>,
}

impl MovingAverageSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Legend label, e.g. "AAPL 30-Day MA".
    pub fn label(&self) -> String {
        format!("{} {}-Day MA", self.symbol, self.window)
    }
}
