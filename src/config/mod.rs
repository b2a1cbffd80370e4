//! Configuration management for berthwatch
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::KeySchema;

/// Default terminal schedule endpoint
pub const DEFAULT_API_URL: &str =
    "https://api.tcp.com.br/tos-bridge/v1/programacao-navios/pesquisar";

/// Longest schedule window accepted, in days
pub const MAX_WINDOW_DAYS: i64 = 366;

/// Longest cache validity accepted, in seconds (one day)
pub const MAX_CACHE_TTL_SECS: u64 = 86_400;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote schedule API configuration
    pub api: ApiConfig,


    /// Schedule normalization configuration
    pub schedule: ScheduleConfig,

    /// Order ingestion configuration
    pub orders: OrdersConfig,

    /// Fetch cache configuration
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Remote schedule API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Search endpoint URL
    pub url: String,

    /// Entries requested per page
    pub page_size: u32,

    /// Hard ceiling on the number of pages fetched per pass
    pub max_pages: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Default window start, in days before now
    pub window_days: i64,

    /// Lifecycle statuses requested from the terminal
    pub statuses: Vec<String>,

    /// Whether obsolete entries are requested
    pub include_obsolete: bool,

    /// User agent string
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            page_size: 100,
            max_pages: 20,
            request_timeout_secs: 15,
            window_days: 7,
            statuses: ["ATRACADO", "PREVISTO", "DESATRACADO", "CANCELADO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            include_obsolete: false,
            user_agent: format!("berthwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Schedule normalization configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Join-key convention shared by normalizer, ingestors and engine
    pub key_schema: KeySchema,

    /// Raw field names in the terminal payload
    pub fields: ScheduleFields,
}

/// Raw field names (dotted paths allowed) projected from each schedule entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleFields {
    pub vessel: String,
    pub voyage: String,
    pub carrier_voyage: String,
    pub carrier: String,
    pub forecast: String,
}

impl Default for ScheduleFields {
    fn default() -> Self {
        Self {
            vessel: String::from("Navio"),
            voyage: String::from("Viagem"),
            carrier_voyage: String::from("ViagemArmador"),
            carrier: String::from("ArmadorNome"),
            forecast: String::from("PrevisaoAtracacao"),
        }
    }
}

/// Order ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersConfig {
    /// Field delimiter for pasted free-text orders
    pub text_delimiter: char,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            text_delimiter: ',',
        }
    }
}

/// Fetch cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Reuse fetch results within the validity window
    pub enabled: bool,

    /// Validity of a cached fetch in seconds (default: 10 minutes)
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 600,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("BERTHWATCH_API_URL") {
            config.api.url = url;
        }
        if let Some(page_size) = env_parse("BERTHWATCH_PAGE_SIZE") {
            config.api.page_size = page_size;
        }
        if let Some(max_pages) = env_parse("BERTHWATCH_MAX_PAGES") {
            config.api.max_pages = max_pages;
        }
        if let Some(timeout) = env_parse("BERTHWATCH_REQUEST_TIMEOUT") {
            config.api.request_timeout_secs = timeout;
        }
        if let Some(window_days) = env_parse("BERTHWATCH_WINDOW_DAYS") {
            config.api.window_days = window_days;
        }
        if let Ok(statuses) = std::env::var("BERTHWATCH_STATUSES") {
            config.api.statuses = statuses
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(user_agent) = std::env::var("BERTHWATCH_USER_AGENT") {
            config.api.user_agent = user_agent;
        }

        if let Ok(schema) = std::env::var("BERTHWATCH_KEY_SCHEMA") {
            config.schedule.key_schema = schema
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid BERTHWATCH_KEY_SCHEMA")?;
        }

        if let Some(delimiter) = env_parse("BERTHWATCH_TEXT_DELIMITER") {
            config.orders.text_delimiter = delimiter;
        }

        if let Some(enabled) = env_parse("BERTHWATCH_CACHE_ENABLED") {
            config.cache.enabled = enabled;
        }
        if let Some(ttl) = env_parse("BERTHWATCH_CACHE_TTL") {
            config.cache.ttl_secs = ttl;
        }

        if let Ok(level) = std::env::var("BERTHWATCH_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("BERTHWATCH_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.url)
            .with_context(|| format!("Invalid API url: {}", self.api.url))?;

        if self.api.page_size == 0 {
            anyhow::bail!("page_size must be greater than 0");
        }

        if self.api.max_pages == 0 {
            anyhow::bail!("max_pages must be greater than 0");
        }

        if self.api.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if !(0..=MAX_WINDOW_DAYS).contains(&self.api.window_days) {
            anyhow::bail!("window_days must be between 0 and {MAX_WINDOW_DAYS}");
        }

        if self.api.statuses.is_empty() {
            anyhow::bail!("at least one schedule status is required");
        }

        if !self.orders.text_delimiter.is_ascii_graphic() {
            anyhow::bail!("text_delimiter must be a visible ASCII character");
        }

        if self.cache.ttl_secs > MAX_CACHE_TTL_SECS {
            anyhow::bail!("cache ttl_secs must be at most {MAX_CACHE_TTL_SECS}");
        }

        Ok(())
    }

    /// Get cache validity as a chrono duration
    #[must_use]
    pub fn cache_ttl(&self) -> chrono::Duration {
        let secs = self.cache.ttl_secs.min(MAX_CACHE_TTL_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or_default())
    }
}
