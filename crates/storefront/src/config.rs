//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ESOUK_HOST` - Bind address (default: 127.0.0.1)
//! - `ESOUK_PORT` - Listen port (default: 3000)
//! - `ESOUK_BASE_URL` - Public URL for the storefront (default: http://localhost:3000)
//! - `ESOUK_API_URL` - Base URL of the e-souk REST backend (default: http://localhost:5001)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

/// Development fallback the original deployments used for the backend.
const DEFAULT_API_URL: &str = "http://localhost:5001";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct EsoukConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Base URL of the e-souk REST backend
    pub api_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl EsoukConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ESOUK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ESOUK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ESOUK_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ESOUK_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("ESOUK_BASE_URL", "http://localhost:3000");
        let api_url = validate_url("ESOUK_API_URL", get_env_or_default("ESOUK_API_URL", DEFAULT_API_URL))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            api_url,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (controls cookie flags).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a value parses as an absolute URL, trimming a trailing slash.
fn validate_url(key: &str, value: String) -> Result<String, ConfigError> {
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_absolute() {
        let url = validate_url("TEST_VAR", "https://e-souk-backend.onrender.com/".to_string());
        assert_eq!(url.unwrap(), "https://e-souk-backend.onrender.com");
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        let result = validate_url("TEST_VAR", "not a url".to_string());
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_socket_addr() {
        let config = EsoukConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = EsoukConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            sentry_dsn: None,
        };
        assert!(!config.is_secure());

        config.base_url = "https://e-souk.example".to_string();
        assert!(config.is_secure());
    }
}
