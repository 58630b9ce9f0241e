// src/config.rs
use crate::analysis::DEFAULT_MA_WINDOW;
use crate::domain::errors::{AppError, AppResult};
use crate::domain::models::SymbolRequest;
use chrono::{NaiveDate, Utc};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// What to fetch and show
    pub selection: SelectionConfig,

    /// Data provider settings
    pub provider: ProviderConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// The sidebar inputs for one interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Symbols in display order (e.g., ["AAPL", "GC=F"])
    pub symbols: Vec<String>,

    /// First day of the range
    pub start_date: NaiveDate,

    /// Day after the last day of the range
    pub end_date: NaiveDate,

    /// Render the moving average chart
    pub show_moving_average: bool,

    /// Moving average window in bars
    pub moving_average_window: usize,

    /// Rows per symbol in the data preview
    pub preview_rows: usize,

    /// How the dashboard is written to stdout
    #[serde(default)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Chart API host
    pub base_url: String,

    /// Sent with every request; the provider rejects requests without one
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Split and dividend adjusted prices
    pub adjusted: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenv().ok();

        let defaults = Config::default();

        let symbols = match env::var("DASHBOARD_SYMBOLS") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => defaults.selection.symbols,
        };

        let selection_config = SelectionConfig {
            symbols,
            start_date: env_date("DASHBOARD_START_DATE")?.unwrap_or(defaults.selection.start_date),
            end_date: env_date("DASHBOARD_END_DATE")?.unwrap_or(defaults.selection.end_date),
            show_moving_average: env_parse("DASHBOARD_SHOW_MA")?
                .unwrap_or(defaults.selection.show_moving_average),
            moving_average_window: env_parse("DASHBOARD_MA_WINDOW")?
                .unwrap_or(defaults.selection.moving_average_window),
            preview_rows: env_parse("DASHBOARD_PREVIEW_ROWS")?
                .unwrap_or(defaults.selection.preview_rows),
            output: env_parse("DASHBOARD_OUTPUT")?.unwrap_or(defaults.selection.output),
        };

        let provider_config = ProviderConfig {
            base_url: env::var("PROVIDER_BASE_URL").unwrap_or(defaults.provider.base_url),
            user_agent: env::var("PROVIDER_USER_AGENT").unwrap_or(defaults.provider.user_agent),
            timeout_secs: env_parse("PROVIDER_TIMEOUT_SECS")?
                .unwrap_or(defaults.provider.timeout_secs),
            adjusted: env_parse("PROVIDER_ADJUSTED")?.unwrap_or(defaults.provider.adjusted),
        };

        let logging_config = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            to_file: env_parse("LOG_TO_FILE")?.unwrap_or(false),
            file_path: env::var("LOG_FILE_PATH").ok(),
        };

        let config = Config {
            selection: selection_config,
            provider: provider_config,
            logging: logging_config,
        };
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            AppError::Config(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, contents).map_err(|e| {
            AppError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Reject settings nothing downstream can work with. An inverted date
    /// range is not rejected; what it returns is up to the provider.
    pub fn validate(&self) -> AppResult<()> {
        if self.selection.moving_average_window == 0 {
            return Err(AppError::Config(
                "Moving average window must be at least 1".to_string(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(AppError::Config(
                "Provider timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Level filter for `logging.level`; unknown names fall back to info.
    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Install the global logger. A log file is only used when `to_file` is
    /// set and a path is given; otherwise output goes to stderr.
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(self.log_level());

        if let (true, Some(path)) = (self.logging.to_file, &self.logging.file_path) {
            let file = File::create(path).map_err(|e| {
                AppError::Config(format!("Failed to create log file {}: {}", path, e))
            })?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        builder
            .try_init()
            .map_err(|e| AppError::Config(format!("Failed to initialize logger: {}", e)))
    }
}

impl SelectionConfig {
    /// The fetch request described by the selection
    pub fn request(&self) -> SymbolRequest {
        SymbolRequest::new(&self.symbols, self.start_date, self.end_date)
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".to_string()],
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN),
            end_date: Utc::now().date_naive(),
            show_moving_average: false,
            moving_average_window: DEFAULT_MA_WINDOW,
            preview_rows: 5,
            output: OutputFormat::Text,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string(),
            timeout_secs: 30,
            adjusted: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            to_file: false,
            file_path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selection: SelectionConfig::default(),
            provider: ProviderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn env_date(name: &str) -> AppResult<Option<NaiveDate>> {
    match env::var(name) {
        Ok(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(|e| AppError::Config(format!("Invalid {} '{}': {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}

fn env_parse<T>(name: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::Config(format!("Invalid {} '{}': {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}
