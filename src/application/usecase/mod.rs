pub mod dashboard_usecase;
pub mod series_fetch_usecase;

// Re-export public API
pub use dashboard_usecase::{DashboardData, DashboardUseCase};
pub use series_fetch_usecase::{SeriesFetchUseCase, SeriesFetcher};
