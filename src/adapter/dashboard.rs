// src/adapter/dashboard.rs
// Presentation of a dashboard interaction

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::adapter::catalog::{display_name, lookup};
use crate::analysis::DEFAULT_MA_WINDOW;
use crate::application::usecase::DashboardData;
use crate::domain::errors::AppResult;
use crate::domain::models::{FetchResult, MovingAverageSeries, PriceBar};

pub const PAGE_TITLE: &str = "Stock & Commodity Price Dashboard";
pub const PAGE_DESCRIPTION: &str =
    "Visualize historical prices for multiple companies, gold, and silver using data from Yahoo Finance.";
pub const EMPTY_SELECTION_WARNING: &str = "Please select at least one symbol from the sidebar.";
pub const PROVIDER_UNAVAILABLE_ERROR: &str =
    "The price provider could not be reached for any symbol. Check your connection and try again.";

const DATE_AXIS_TITLE: &str = "Date";
const PRICE_AXIS_TITLE: &str = "Price (USD/INR)";
const CHART_TEMPLATE: &str = "plotly_dark";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Warning(String),
    Error(String),
}

/// One line of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    /// `None` renders as a gap.
    pub y: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub template: String,
    pub show_legend: bool,
    pub traces: Vec<Trace>,
}

impl ChartSpec {
    fn line_chart(title: String, traces: Vec<Trace>) -> Self {
        Self {
            title,
            x_axis_title: DATE_AXIS_TITLE.to_string(),
            y_axis_title: PRICE_AXIS_TITLE.to_string(),
            template: CHART_TEMPLATE.to_string(),
            show_legend: true,
            traces,
        }
    }

    /// Legend entries in drawing order.
    pub fn legend(&self) -> Vec<&str> {
        self.traces.iter().map(|t| t.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTable {
    pub symbol: String,
    pub heading: String,
    /// Catalogue category; `None` for symbols typed in by hand.
    pub category: Option<String>,
    pub rows: Vec<PriceBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub description: String,
    pub notices: Vec<Notice>,
    pub previews: Vec<PreviewTable>,
    pub price_chart: Option<ChartSpec>,
    pub moving_average_chart: Option<ChartSpec>,
}

impl DashboardView {
    pub fn build(data: &DashboardData, preview_rows: usize) -> Self {
        let mut view = Self {
            title: PAGE_TITLE.to_string(),
            description: PAGE_DESCRIPTION.to_string(),
            notices: Vec::new(),
            previews: Vec::new(),
            price_chart: None,
            moving_average_chart: None,
        };

        match data {
            DashboardData::NothingSelected => {
                view.notices
                    .push(Notice::Warning(EMPTY_SELECTION_WARNING.to_string()));
            }
            DashboardData::Loaded {
                result,
                moving_averages,
                ..
            } => {
                view.notices = notices(result);
                view.previews = previews(result, preview_rows);
                view.price_chart = Some(price_chart(result));
                view.moving_average_chart = moving_averages.as_deref().map(moving_average_chart);
            }
        }

        view
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn notices(result: &FetchResult) -> Vec<Notice> {
    if result.provider_unavailable() {
        return vec![Notice::Error(PROVIDER_UNAVAILABLE_ERROR.to_string())];
    }

    result
        .iter()
        .filter(|(_, series)| series.is_empty())
        .map(|(symbol, _)| match result.failure(symbol) {
            Some(error) => Notice::Warning(format!("Could not load {}: {}", symbol, error)),
            None => Notice::Warning(format!("No data for {} in the selected range", symbol)),
        })
        .collect()
}

fn previews(result: &FetchResult, rows: usize) -> Vec<PreviewTable> {
    result
        .iter()
        .map(|(symbol, series)| PreviewTable {
            symbol: symbol.to_string(),
            heading: format!("Data Preview for {}", display_name(symbol)),
            category: lookup(symbol).map(|s| s.category.to_string()),
            rows: series.tail(rows).to_vec(),
        })
        .collect()
}

/// Close price per symbol. Symbols without data get no line.
fn price_chart(result: &FetchResult) -> ChartSpec {
    let traces = result
        .iter()
        .filter(|(_, series)| !series.is_empty())
        .map(|(symbol, series)| Trace {
            name: symbol.to_string(),
            x: series.dates(),
            y: series.bars().iter().map(|b| Some(b.close)).collect(),
        })
        .collect();

    ChartSpec::line_chart(
        "Closing Price Chart for Selected Symbols".to_string(),
        traces,
    )
}

fn moving_average_chart(averages: &[MovingAverageSeries]) -> ChartSpec {
    let window = averages.first().map_or(DEFAULT_MA_WINDOW, |ma| ma.window);
    let traces = averages
        .iter()
        .filter(|ma| !ma.is_empty())
        .map(|ma| Trace {
            name: ma.label(),
            x: ma.points.iter().map(|p| p.date).collect(),
            y: ma.values(),
        })
        .collect();

    ChartSpec::line_chart(format!("{}-Day Moving Average Chart", window), traces)
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Notice::Warning(msg) => write!(f, "WARNING: {}", msg),
            Notice::Error(msg) => write!(f, "ERROR: {}", msg),
        }
    }
}

impl fmt::Display for PreviewTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.category {
            Some(category) => writeln!(f, "{} [{}]", self.heading, category)?,
            None => writeln!(f, "{}", self.heading)?,
        }
        if self.rows.is_empty() {
            return writeln!(f, "  (no rows)");
        }
        writeln!(
            f,
            "  {:<10}  {:>12}  {:>12}  {:>12}  {:>12}  {:>14}",
            "Date", "Open", "High", "Low", "Close", "Volume"
        )?;
        for bar in &self.rows {
            writeln!(
                f,
                "  {:<10}  {:>12.4}  {:>12.4}  {:>12.4}  {:>12.4}  {:>14}",
                bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ChartSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if self.traces.is_empty() {
            return writeln!(f, "  (nothing to plot)");
        }
        for trace in &self.traces {
            let defined: Vec<f64> = trace.y.iter().flatten().copied().collect();
            match (trace.x.first(), trace.x.last(), defined.last()) {
                (Some(first), Some(last), Some(latest)) => writeln!(
                    f,
                    "  {:<20} {} points {} .. {}  latest {:.4}",
                    trace.name,
                    trace.x.len(),
                    first,
                    last,
                    latest
                )?,
                _ => writeln!(
                    f,
                    "  {:<20} {} points, none defined yet",
                    trace.name,
                    trace.x.len()
                )?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.description)?;
        for notice in &self.notices {
            writeln!(f)?;
            writeln!(f, "{}", notice)?;
        }
        for preview in &self.previews {
            writeln!(f)?;
            write!(f, "{}", preview)?;
        }
        if let Some(chart) = &self.price_chart {
            writeln!(f)?;
            write!(f, "{}", chart)?;
        }
        if let Some(chart) = &self.moving_average_chart {
            writeln!(f)?;
            write!(f, "{}", chart)?;
        }
        Ok(())
    }
}
