// src/application/usecase/series_fetch_usecase.rs
// Multi-symbol retrieval with memoization

use async_trait::async_trait;
use futures_util::future::join_all;
use std::sync::Arc;

use crate::domain::models::{FetchResult, SymbolRequest};
use crate::domain::repository::{PriceProvider, SeriesCache};

#[async_trait]
pub trait SeriesFetchUseCase: Send + Sync {
    /// One entry per requested symbol, in request order. Never fails as a
    /// whole: a symbol whose retrieval fails gets an empty series and a
    /// recorded error.
    async fn fetch(&self, request: &SymbolRequest) -> FetchResult;
}

/// Fetches every symbol of a request concurrently and memoizes the result
/// per request key for the lifetime of the cache.
pub struct SeriesFetcher {
    provider: Arc<dyn PriceProvider>,
    cache: Arc<dyn SeriesCache>,
}

impl SeriesFetcher {
    pub fn new(provider: Arc<dyn PriceProvider>, cache: Arc<dyn SeriesCache>) -> Self {
        Self { provider, cache }
    }

    async fn fetch_uncached(&self, request: &SymbolRequest) -> FetchResult {
        let fetches = request.symbols().iter().map(|symbol| async move {
            let outcome = self
                .provider
                .daily_history(symbol, request.start, request.end)
                .await;
            (symbol, outcome)
        });

        let mut result = FetchResult::new();
        for (symbol, outcome) in join_all(fetches).await {
            match outcome {
                Ok(mut series) => {
                    if series.is_empty() {
                        log::warn!(
                            "{} returned no rows for {} between {} and {}",
                            self.provider.name(),
                            symbol,
                            request.start,
                            request.end
                        );
                    }
                    // key by what was asked for, whatever the provider echoes back
                    series.symbol = symbol.clone();
                    result.insert(series);
                }
                Err(e) => {
                    log::warn!("Failed to fetch {} from {}: {}", symbol, self.provider.name(), e);
                    result.insert_failure(symbol, e);
                }
            }
        }

        if result.provider_unavailable() {
            log::error!("{} unreachable for every requested symbol", self.provider.name());
        }

        result
    }
}

#[async_trait]
impl SeriesFetchUseCase for SeriesFetcher {
    async fn fetch(&self, request: &SymbolRequest) -> FetchResult {
        if request.is_empty() {
            return FetchResult::new();
        }
        if request.is_inverted() {
            log::warn!(
                "Start date {} is after end date {}; passing the range to {} as given",
                request.start,
                request.end,
                self.provider.name()
            );
        }

        let slot = self.cache.slot(&request.key());
        if slot.initialized() {
            log::info!("Cache hit for {:?} {}..{}", request.symbols(), request.start, request.end);
        } else {
            log::info!("Fetching {:?} {}..{}", request.symbols(), request.start, request.end);
        }

        let cached = slot.get_or_init(|| self.fetch_uncached(request)).await;
        cached.reordered(request.symbols())
    }
}
