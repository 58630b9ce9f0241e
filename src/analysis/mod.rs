// src/analysis/mod.rs
pub mod indicators;

pub use indicators::{derive_ma, derive_moving_averages, DEFAULT_MA_WINDOW};
