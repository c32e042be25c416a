//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_API_BASE_URL` - Base URL of the marketplace REST API
//! - `STOREFRONT_CDN_BASE_URL` - Base URL that product and profile images are served from
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_FEATURED_CATEGORIES` - Comma-separated category IDs shown under "Semua"
//! - `STOREFRONT_STATS_POLL_SECS` - Seller stats refresh interval (default: 300)
//! - `STOREFRONT_API_TIMEOUT_SECS` - Remote API request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use pusatoleh_core::CategoryId;
use thiserror::Error;
use url::Url;

/// Categories aggregated on the landing page when no category is selected:
/// Makanan, Aksesoris, Souvenir, Kerajinan, Batik.
pub const DEFAULT_FEATURED_CATEGORIES: &[&str] = &[
    "6785f0775a994cdd532040ad",
    "6785f09d5a994cdd532040b0",
    "6785f0d35a994cdd532040b3",
    "6785f0eb5a994cdd532040b6",
    "6785f0fc5a994cdd532040b9",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Remote REST API configuration
    pub api: ApiConfig,
    /// CDN base URL for media
    pub cdn_base_url: Url,
    /// Categories aggregated on the landing page
    pub featured_categories: Vec<CategoryId>,
    /// How often the seller home page refreshes its counters
    pub stats_poll_interval: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Remote REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.pusatoleholeh.id`
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env
            .or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string()))?;
        let base_url = env.or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        let api = ApiConfig {
            base_url: env.url("STOREFRONT_API_BASE_URL")?,
            timeout: Duration::from_secs(env.secs("STOREFRONT_API_TIMEOUT_SECS", 30)?),
        };
        let cdn_base_url = env.url("STOREFRONT_CDN_BASE_URL")?;

        let featured_categories = env.optional("STOREFRONT_FEATURED_CATEGORIES").map_or_else(
            || {
                DEFAULT_FEATURED_CATEGORIES
                    .iter()
                    .map(|id| CategoryId::new(*id))
                    .collect()
            },
            |list| parse_id_list(&list),
        );

        let stats_poll_interval =
            Duration::from_secs(env.secs("STOREFRONT_STATS_POLL_SECS", 300)?);

        Ok(Self {
            host,
            port,
            base_url,
            api,
            cdn_base_url,
            featured_categories,
            stats_poll_interval,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a required absolute http(s) URL.
    fn url(&self, key: &str) -> Result<Url, ConfigError> {
        let raw = self.required(key)?;
        let url = Url::parse(raw.trim())
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }

    /// Get a positive number of seconds.
    fn secs(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        match raw.trim().parse::<u64>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be greater than zero".to_string(),
            )),
            Ok(secs) => Ok(secs),
            Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        }
    }
}

/// Split a comma-separated list of IDs, dropping blanks.
fn parse_id_list(list: &str) -> Vec<CategoryId> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(CategoryId::new)
        .collect()
}
