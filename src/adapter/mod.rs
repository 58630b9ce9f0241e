// src/adapter/mod.rs
pub mod catalog;
pub mod dashboard;

pub use dashboard::{ChartSpec, DashboardView, Notice, PreviewTable, Trace};
