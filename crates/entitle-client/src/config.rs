//! Entitle API client configuration.
//!
//! Configuration is always passed explicitly into
//! [`EntitleClient::new`](crate::EntitleClient::new) — there is no global
//! provider and no lazily initialized default, so concurrent clients with
//! different credentials or endpoints never interfere.

use url::Url;

/// Configuration for connecting to the Entitle service.
///
/// Custom `Debug` implementation redacts the `api_key` field to prevent
/// credential leakage in log output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the service.
    /// Default: <https://api.entitle.io>
    pub base_url: Url,
    /// API key used as the basic-auth password.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Public key (stripped base64) for offline document verification.
    /// `None` means offline documents are trusted without verification —
    /// a per-context decision, made once, never per response.
    pub validation_key: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("validation_key", &self.validation_key)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the
    /// endpoint and credentials.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            timeout_secs: 30,
            validation_key: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ENTITLE_BASE_URL` (default: `https://api.entitle.io`)
    /// - `ENTITLE_API_KEY` (required)
    /// - `ENTITLE_TIMEOUT_SECS` (default: 30)
    /// - `ENTITLE_VALIDATION_KEY` (optional, stripped base64)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            std::env::var("ENTITLE_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        let base_url = env_url("ENTITLE_BASE_URL", "https://api.entitle.io")?;

        Ok(Self {
            base_url,
            api_key,
            timeout_secs: std::env::var("ENTITLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            validation_key: std::env::var("ENTITLE_VALIDATION_KEY").ok(),
        })
    }

    /// Set the offline validation public key. Builder-style.
    pub fn with_validation_key(mut self, key: impl Into<String>) -> Self {
        self.validation_key = Some(key.into());
        self
    }

    /// Set the request timeout. Builder-style.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No API key was provided.
    #[error("ENTITLE_API_KEY environment variable is required")]
    MissingApiKey,

    /// A URL variable failed to parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),

    /// The API key cannot be placed in an `Authorization` header.
    #[error("API key cannot be encoded into an Authorization header")]
    InvalidApiKey,
}
