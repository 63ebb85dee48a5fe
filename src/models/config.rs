//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream provider and HTTP client settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Outbound throttling
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Result table location
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// HTTP surface bind address
    #[serde(default)]
    pub server: ServerConfig,

    /// Text attached to every response
    #[serde(default)]
    pub attribution: AttributionConfig,

    /// Log verbosity
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration if the file exists, defaults otherwise.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_if_present(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply the environment overrides understood by the service.
    ///
    /// `TARGET_BASE`, `TARGET_PATH`, `MIN_INTERVAL` (seconds), `COPYRIGHT_HANDLE`, `PORT`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base) = lookup("TARGET_BASE") {
            self.upstream.base_url = base;
        }
        if let Some(path) = lookup("TARGET_PATH") {
            self.upstream.path = path;
        }
        if let Some(raw) = lookup("MIN_INTERVAL") {
            match raw.trim().parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs >= 0.0 => {
                    self.rate_limit.min_interval_ms = (secs * 1000.0).round() as u64;
                }
                _ => log::warn!("Ignoring MIN_INTERVAL={raw:?}: not a non-negative number"),
            }
        }
        if let Some(handle) = lookup("COPYRIGHT_HANDLE") {
            self.attribution.handle = handle;
        }
        if let Some(raw) = lookup("PORT") {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => log::warn!("Ignoring PORT={raw:?}: {e}"),
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.user_agent.trim().is_empty() {
            return Err(AppError::validation("upstream.user_agent is empty"));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(AppError::validation("upstream.timeout_secs must be > 0"));
        }
        if self.upstream.path.trim().is_empty() {
            return Err(AppError::validation("upstream.path is empty"));
        }
        if self.upstream.query_field.trim().is_empty() {
            return Err(AppError::validation("upstream.query_field is empty"));
        }
        self.upstream.endpoint()?;
        if self.attribution.handle.trim().is_empty() {
            return Err(AppError::validation("attribution.handle is empty"));
        }
        Selector::parse(&self.extraction.table_selector)
            .map_err(|e| AppError::selector(&self.extraction.table_selector, format!("{e:?}")))?;
        Ok(())
    }
}

/// Upstream provider and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Scheme and host of the provider
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Path of the search form target
    #[serde(default = "defaults::path")]
    pub path: String,

    /// Form field carrying the normalized query
    #[serde(default = "defaults::query_field")]
    pub query_field: String,

    /// User-Agent header; the provider refuses non-browser agents
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Base URL without trailing slashes.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Full URL the search form is posted to.
    pub fn endpoint(&self) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base(), self.path))?)
    }

    /// Referer header value sent with every request.
    pub fn referer(&self) -> String {
        format!("{}/", self.base())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            path: defaults::path(),
            query_field: defaults::query_field(),
            user_agent: defaults::user_agent(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Outbound throttling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum time between two upstream calls, in milliseconds
    #[serde(default = "defaults::min_interval")]
    pub min_interval_ms: u64,
}

impl RateLimitConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: defaults::min_interval(),
        }
    }
}

/// Result table location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Selector for the marked result table; the first table is used when nothing matches
    #[serde(default = "defaults::table_selector")]
    pub table_selector: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            table_selector: defaults::table_selector(),
        }
    }
}

/// HTTP surface bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
        }
    }
}

/// Attribution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionConfig {
    /// Operator handle shown in every response
    #[serde(default = "defaults::handle")]
    pub handle: String,
}

impl AttributionConfig {
    /// The full notice placed in the `copyright` field.
    pub fn notice(&self) -> String {
        format!("👉🏻 {}", self.handle)
    }
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            handle: defaults::handle(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Upstream defaults
    pub fn base_url() -> String {
        "https://pakistandatabase.com".into()
    }
    pub fn path() -> String {
        "/databases/sim.php".into()
    }
    pub fn query_field() -> String {
        "search_query".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36"
            .into()
    }
    pub fn accept_language() -> String {
        "en-US,en;q=0.9".into()
    }
    pub fn timeout() -> u64 {
        20
    }

    // Rate limit defaults
    pub fn min_interval() -> u64 {
        1000
    }

    // Extraction defaults
    pub fn table_selector() -> String {
        "table.api-response".into()
    }

    // Server defaults
    pub fn host() -> String {
        "0.0.0.0".into()
    }
    pub fn port() -> u16 {
        5000
    }

    pub fn handle() -> String {
        "@never_delete".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
