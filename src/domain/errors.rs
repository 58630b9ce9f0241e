// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while retrieving a single symbol's history.
///
/// The fetcher never lets one of these escape a batch: they are recorded
/// against the symbol that produced them and the symbol gets an empty series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed row {index} for {symbol}: missing {field}")]
    MalformedRow {
        symbol: String,
        index: usize,
        field: &'static str,
    },

    #[error("Data parse error: {0}")]
    Parse(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
}

impl ProviderError {
    /// Transport-level failures, as opposed to bad data from a reachable provider.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProviderError::Request(_) | ProviderError::Timeout(_) | ProviderError::Http { .. }
        )
    }
}

impl From<hyper::Error> for ProviderError {
    fn from(err: hyper::Error) -> Self {
        ProviderError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid moving average window: {0}")]
    InvalidWindow(usize),
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type ProviderResult<T> = Result<T, ProviderError>;
pub type AnalysisResult<T> = Result<T, AnalysisError>;
