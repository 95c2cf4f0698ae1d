//! Directory API client configuration.
//!
//! A single base URL for the REST backend plus the transport timeout.
//! Defaults point at a locally running backend. Override via environment
//! variables or explicit construction for testing.

use url::Url;

/// Default backend address.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default transport timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the directory backend.
#[derive(Debug, Clone)]
pub struct FabrikaApiConfig {
    /// Base URL of the REST backend.
    /// Default: <http://localhost:8000>
    pub base_url: Url,
    /// Request timeout in seconds. This is the only client-side timeout.
    pub timeout_secs: u64,
}

impl FabrikaApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `FABRIKA_API_URL` (default: `http://localhost:8000`)
    /// - `FABRIKA_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("FABRIKA_API_URL", DEFAULT_API_URL)?,
            timeout_secs: std::env::var("FABRIKA_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Configuration for an explicit base URL with the default timeout.
    pub fn with_base_url(raw: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl("base URL".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
