// src/infrastructure/cache/mod.rs
// Process-lifetime memo table for fetch results

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

use crate::domain::models::{FetchResult, RequestKey};
use crate::domain::repository::SeriesCache;

/// Unbounded in-memory cache: no eviction, no expiry. An entry is kept for as
/// long as the cache lives, so a range ending "today" stays frozen at the
/// moment it was first fetched.
#[derive(Default)]
pub struct InMemorySeriesCache {
    slots: Mutex<HashMap<RequestKey, Arc<OnceCell<FetchResult>>>>,
}

impl InMemorySeriesCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeriesCache for InMemorySeriesCache {
    fn slot(&self, key: &RequestKey) -> Arc<OnceCell<FetchResult>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}
