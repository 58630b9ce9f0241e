// src/infrastructure/mod.rs
pub mod cache;
pub mod market;

pub use cache::InMemorySeriesCache;
pub use market::YahooPriceProvider;
