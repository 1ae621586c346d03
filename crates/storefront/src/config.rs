//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `VITRINE_HOST` - Bind address (default: 127.0.0.1)
//! - `VITRINE_PORT` - Listen port (default: 3000)
//! - `VITRINE_API_BASE_URL` - Product/auth API (default: <https://fakestoreapi.com>)
//! - `VITRINE_API_TIMEOUT_MS` - Per-request timeout (default: 10000)
//! - `VITRINE_API_MAX_RETRIES` - Retries for transient failures (default: 3)
//! - `VITRINE_API_RETRY_BASE_MS` - First retry delay, doubled per attempt (default: 1000)
//! - `VITRINE_VIACEP_URL` - Postal code lookup (default: <https://viacep.com.br/ws>)
//! - `VITRINE_DATA_DIR` - Directory for cart, orders and session files (default: ./.vitrine)
//! - `VITRINE_APP_NAME` - Display name (default: E-commerce)
//! - `VITRINE_APP_VERSION` - Display version (default: 1.0.0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::api::RetryPolicy;

pub const DEFAULT_API_BASE_URL: &str = "https://fakestoreapi.com";
pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br/ws";
pub const DEFAULT_DATA_DIR: &str = "./.vitrine";

/// Backoff never waits longer than this between retries.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// Product/auth API client settings
    pub api: ApiConfig,
    /// Postal code lookup base URL
    pub viacep_url: String,
    /// Directory backing local storage
    pub data_dir: PathBuf,
    /// Display name and version
    pub app: AppInfo,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Upstream API settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

/// Application name and version shown to users.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            api: ApiConfig::default(),
            viacep_url: DEFAULT_VIACEP_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            app: AppInfo::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_millis(10_000),
            retry: RetryPolicy::default(),
        }
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "E-commerce".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or("VITRINE_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = env.parse_or("VITRINE_PORT", 3000u16)?;

        let base_url = env.url_or("VITRINE_API_BASE_URL", DEFAULT_API_BASE_URL)?;
        let timeout_ms = env.parse_or("VITRINE_API_TIMEOUT_MS", 10_000u64)?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VITRINE_API_TIMEOUT_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let retry = RetryPolicy {
            max_retries: env.parse_or("VITRINE_API_MAX_RETRIES", 3u32)?,
            base_delay: Duration::from_millis(env.parse_or("VITRINE_API_RETRY_BASE_MS", 1000u64)?),
            max_delay: MAX_RETRY_DELAY,
        };

        Ok(Self {
            host,
            port,
            api: ApiConfig {
                base_url,
                timeout: Duration::from_millis(timeout_ms),
                retry,
            },
            viacep_url: env.url_or("VITRINE_VIACEP_URL", DEFAULT_VIACEP_URL)?,
            data_dir: PathBuf::from(env.get_or("VITRINE_DATA_DIR", DEFAULT_DATA_DIR)),
            app: AppInfo {
                name: env.get_or("VITRINE_APP_NAME", "E-commerce"),
                version: env.get_or("VITRINE_APP_VERSION", "1.0.0"),
            },
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with typed accessors.
struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; empty values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Get a URL variable, validated and without a trailing slash.
    fn url_or(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        let value = self.get_or(key, default);
        let url = Url::parse(&value)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme {:?}", url.scheme()),
            ));
        }
        Ok(value.trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.api.base_url, "https://fakestoreapi.com");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.retry, RetryPolicy::default());
        assert_eq!(config.viacep_url, "https://viacep.com.br/ws");
        assert_eq!(config.data_dir, PathBuf::from("./.vitrine"));
        assert_eq!(config.app.name, "E-commerce");
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("VITRINE_HOST", "0.0.0.0"),
            ("VITRINE_PORT", "8080"),
            ("VITRINE_API_BASE_URL", "http://localhost:9000/"),
            ("VITRINE_API_TIMEOUT_MS", "2500"),
            ("VITRINE_API_MAX_RETRIES", "0"),
            ("VITRINE_API_RETRY_BASE_MS", "50"),
            ("VITRINE_DATA_DIR", "/var/lib/vitrine"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.timeout, Duration::from_millis(2500));
        assert_eq!(config.api.retry.max_retries, 0);
        assert_eq!(config.api.retry.base_delay, Duration::from_millis(50));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/vitrine"));
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = load(&[("VITRINE_PORT", ""), ("SENTRY_DSN", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("VITRINE_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "VITRINE_PORT"));
    }

    #[test]
    fn test_invalid_url() {
        assert!(load(&[("VITRINE_API_BASE_URL", "fakestoreapi.com")]).is_err());
        assert!(load(&[("VITRINE_VIACEP_URL", "ftp://viacep.com.br/ws")]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(load(&[("VITRINE_API_TIMEOUT_MS", "0")]).is_err());
    }
}
