//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::RecommendationKind;

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "READNEXT_API_BASE_URL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Recommendation API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Query cache and retry behavior
    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override the base URL with a non-blank value (taken from [`BASE_URL_ENV`]).
    pub(crate) fn apply_base_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            log::debug!("Using API base URL from {}", BASE_URL_ENV);
            self.api.base_url = url.trim().to_string();
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "api.base_url must be http(s), got '{}'",
                base.scheme()
            )));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::config("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        if self.query.retry_max_delay_ms < self.query.retry_base_delay_ms {
            return Err(AppError::config(
                "query.retry_max_delay_ms must be >= query.retry_base_delay_ms",
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are appended to
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Cache freshness and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "defaults::global_stale")]
    pub global_stale_secs: u64,

    #[serde(default = "defaults::user_stale")]
    pub user_stale_secs: u64,

    #[serde(default = "defaults::items_stale")]
    pub items_stale_secs: u64,

    /// Entries unused for this long are dropped from the cache
    #[serde(default = "defaults::gc")]
    pub gc_secs: u64,

    /// Retries after the first failed attempt
    #[serde(default = "defaults::retries")]
    pub retries: u32,

    #[serde(default = "defaults::retry_base_delay")]
    pub retry_base_delay_ms: u64,

    #[serde(default = "defaults::retry_max_delay")]
    pub retry_max_delay_ms: u64,
}

impl QueryConfig {
    /// Freshness window for a kind of query.
    pub fn stale_time(&self, kind: RecommendationKind) -> Duration {
        let secs = match kind {
            RecommendationKind::Global => self.global_stale_secs,
            RecommendationKind::User => self.user_stale_secs,
            RecommendationKind::Items => self.items_stale_secs,
        };
        Duration::from_secs(secs)
    }

    /// How long an unused cache entry is kept.
    pub fn gc_time(&self) -> Duration {
        Duration::from_secs(self.gc_secs)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            global_stale_secs: defaults::global_stale(),
            user_stale_secs: defaults::user_stale(),
            items_stale_secs: defaults::items_stale(),
            gc_secs: defaults::gc(),
            retries: defaults::retries(),
            retry_base_delay_ms: defaults::retry_base_delay(),
            retry_max_delay_ms: defaults::retry_max_delay(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info` or `debug`
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    // API defaults
    pub fn base_url() -> String {
        "http://localhost:8080/api".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn user_agent() -> String {
        concat!("readnext/", env!("CARGO_PKG_VERSION")).into()
    }

    // Query defaults
    pub fn global_stale() -> u64 {
        5 * 60
    }
    pub fn user_stale() -> u64 {
        3 * 60
    }
    pub fn items_stale() -> u64 {
        5 * 60
    }
    pub fn gc() -> u64 {
        5 * 60
    }
    pub fn retries() -> u32 {
        2
    }
    pub fn retry_base_delay() -> u64 {
        1_000
    }
    pub fn retry_max_delay() -> u64 {
        30_000
    }

    pub fn level() -> String {
        "info".into()
    }
}
