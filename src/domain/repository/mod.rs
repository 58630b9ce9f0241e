// src/domain/repository/mod.rs
// Seams between the fetch use case and the outside world

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::domain::errors::ProviderResult;
use crate::domain::models::{FetchResult, PriceSeries, RequestKey};

/// Source of daily price history.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Provider name, for logging.
    fn name(&self) -> &str;

    /// Daily bars for `symbol` between `start` and `end`.
    ///
    /// An unknown symbol or a range without trading is `Ok` with an empty
    /// series. `Err` is reserved for failures to get an answer at all, or
    /// for answers that cannot be turned into bars.
    async fn daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<PriceSeries>;
}

/// Memo table for fetch results.
///
/// A slot is handed out per key and filled at most once, so callers racing on
/// the same key end up awaiting a single fetch.
pub trait SeriesCache: Send + Sync {
    fn slot(&self, key: &RequestKey) -> Arc<OnceCell<FetchResult>>;

    /// Number of keys with a filled slot.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
