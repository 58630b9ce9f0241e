// src/application/usecase/dashboard_usecase.rs
// One dashboard interaction: selection in, data for the charts out

use std::sync::Arc;

use crate::analysis::derive_moving_averages;
use crate::application::usecase::SeriesFetchUseCase;
use crate::config::SelectionConfig;
use crate::domain::errors::AppResult;
use crate::domain::models::{FetchResult, MovingAverageSeries, SymbolRequest};

/// Everything presentation needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardData {
    /// No symbols selected; nothing was fetched.
    NothingSelected,
    Loaded {
        request: SymbolRequest,
        result: FetchResult,
        /// Present only when the moving average chart was asked for.
        moving_averages: Option<Vec<MovingAverageSeries>>,
    },
}

pub struct DashboardUseCase {
    fetcher: Arc<dyn SeriesFetchUseCase>,
}

impl DashboardUseCase {
    pub fn new(fetcher: Arc<dyn SeriesFetchUseCase>) -> Self {
        Self { fetcher }
    }

    pub async fn load(&self, selection: &SelectionConfig) -> AppResult<DashboardData> {
        let request = selection.request();
        if request.is_empty() {
            log::info!("No symbols selected");
            return Ok(DashboardData::NothingSelected);
        }

        let result = self.fetcher.fetch(&request).await;

        let moving_averages = if selection.show_moving_average {
            Some(derive_moving_averages(
                &result,
                selection.moving_average_window,
            )?)
        } else {
            None
        };

        Ok(DashboardData::Loaded {
            request,
            result,
            moving_averages,
        })
    }
}
