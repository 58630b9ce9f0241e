// src/main.rs
use price_dashboard::adapter::DashboardView;
use price_dashboard::application::usecase::{DashboardUseCase, SeriesFetcher};
use price_dashboard::config::{Config, OutputFormat};
use price_dashboard::domain::errors::AppResult;
use price_dashboard::infrastructure::{InMemorySeriesCache, YahooPriceProvider};

use std::sync::Arc;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting price_dashboard v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Selection: {:?} from {} to {}, moving average {}",
        config.selection.symbols,
        config.selection.start_date,
        config.selection.end_date,
        if config.selection.show_moving_average { "on" } else { "off" }
    );

    let provider = Arc::new(YahooPriceProvider::new(&config.provider));
    let cache = Arc::new(InMemorySeriesCache::new());
    let fetcher = Arc::new(SeriesFetcher::new(provider, cache));
    let dashboard = DashboardUseCase::new(fetcher);

    let data = dashboard.load(&config.selection).await?;
    let view = DashboardView::build(&data, config.selection.preview_rows);

    match config.selection.output {
        OutputFormat::Text => print!("{}", view),
        OutputFormat::Json => println!("{}", view.to_json()?),
    }

    log::info!(
        "Rendered {} preview(s), {} notice(s)",
        view.previews.len(),
        view.notices.len()
    );
    Ok(())
}
