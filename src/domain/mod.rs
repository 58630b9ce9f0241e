// src/domain/mod.rs
pub mod errors;
pub mod models;
pub mod repository;

// Re-export common types for convenience
pub use errors::{AnalysisError, AnalysisResult, AppError, AppResult, ProviderError, ProviderResult};
pub use models::{
    FetchResult, MovingAveragePoint, MovingAverageSeries, PriceBar, PriceSeries, RequestKey,
    SymbolRequest,
};
pub use repository::{PriceProvider, SeriesCache};
