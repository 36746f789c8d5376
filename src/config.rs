//! Client configuration

use crate::error::{ClientError, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without trailing slash
    pub base_url: String,

    /// Static key sent as `x-api-key` on every request
    pub api_key: String,

    /// Per-request timeout for the reqwest transport
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config with the default timeout. A trailing `/` on the base URL is dropped.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load from the environment (and `.env` if present)
    ///
    /// - `GRUPOPAZ_API_BASE_URL` (default `http://localhost:8080`)
    /// - `GRUPOPAZ_API_KEY` (default empty)
    /// - `GRUPOPAZ_HTTP_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url =
            env::var("GRUPOPAZ_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = env::var("GRUPOPAZ_API_KEY").unwrap_or_default();
        let timeout_secs = match env::var("GRUPOPAZ_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ClientError::Configuration(format!("Invalid GRUPOPAZ_HTTP_TIMEOUT_SECS {raw:?}: {e}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self::new(base_url, api_key).with_timeout(Duration::from_secs(timeout_secs));
        config.validate()?;
        Ok(config)
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject a base URL that is not http(s)
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Configuration(format!(
                "Base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Absolute URL for a server-relative path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, "")
    }
}
