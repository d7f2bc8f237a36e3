//! Configuration management for the farescope client.
//!
//! This module provides configuration handling via environment variables with sensible defaults.
//! All configuration parameters can be customized through environment variables with the
//! FARESCOPE_ prefix.
//!
//! # Environment Variables
//! - FARESCOPE_BASE_URL: Provider API base URL (required)
//! - FARESCOPE_API_KEY: Provider API key (required)
//! - FARESCOPE_API_SECRET: Provider API secret (required)
//! - FARESCOPE_MIN_REQUEST_INTERVAL_MS: Minimum spacing between requests (default: 150)
//! - FARESCOPE_MAX_RETRIES: Extra attempts after a 429 response (default: 2)
//! - FARESCOPE_RETRY_BASE_DELAY_MS: Exponential backoff base (default: 1000)
//! - FARESCOPE_TOKEN_EXPIRY_MARGIN_SECS: Safety margin on token expiry (default: 60)
//! - FARESCOPE_CURRENCY_CODE: Currency for returned prices (default: USD)
//! - FARESCOPE_MAX_RESULTS: Offer cap per search (default: 50)
//! - FARESCOPE_REQUEST_TIMEOUT_SECS: HTTP request timeout (default: 10)

use serde::Deserialize;
use std::env;

/// Prefix for all farescope environment variables.
/// All config env vars must start with "FARESCOPE_".
const ENV_PREFIX: &str = "FARESCOPE_";

/// Configuration for the provider access layer.
///
/// Credentials identify the application against the provider's OAuth2
/// token endpoint; the remaining knobs tune throttling and retry
/// behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Provider API base URL, e.g. "https://test.api.amadeus.com"
    #[serde(default)]
    pub base_url: String,

    /// OAuth2 client id for the client-credentials exchange
    #[serde(default)]
    pub api_key: String,

    /// OAuth2 client secret for the client-credentials exchange
    #[serde(default)]
    pub api_secret: String,

    /// Minimum spacing between outbound data requests.
    /// Client-side rate-limit avoidance, not a correctness requirement.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Extra attempts after a 429 response before surfacing RateLimited.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff when no Retry-After header is
    /// present. Delay for attempt n is `base * 2^n` milliseconds.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Seconds subtracted from the provider's expires_in when caching a
    /// token, guarding against clock skew and request latency.
    #[serde(default = "default_token_expiry_margin_secs")]
    pub token_expiry_margin_secs: i64,

    /// Currency code requested from the provider.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Maximum offers requested per flight search.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_min_request_interval_ms() -> u64 {
    150
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_token_expiry_margin_secs() -> i64 {
    60
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_max_results() -> u32 {
    50
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl ClientConfig {
    /// Attempts to load configuration from environment variables.
    ///
    /// # Environment Variables
    /// All variables must be prefixed with "FARESCOPE_". For example:
    /// - FARESCOPE_BASE_URL=https://test.api.amadeus.com
    /// - FARESCOPE_API_KEY=abc123
    ///
    /// # Returns
    /// - Ok(config) if all required variables are present and valid
    /// - Err(message) if any variables are missing or invalid
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists for local development
        dotenv::dotenv().ok();

        // Filter and transform environment variables
        let env_vars: std::collections::HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .map(|(k, v)| (k.trim_start_matches(ENV_PREFIX).to_string(), v))
            .collect();

        // Parse and validate configuration
        match envy::from_iter::<_, Self>(env_vars.into_iter()) {
            Ok(config) => {
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(format!("Failed to parse environment variables: {}", e)),
        }
    }

    /// Loads configuration from environment variables, logging a loud
    /// diagnostic and falling back to defaults when required values are
    /// missing. Startup never fails synchronously; requests made with an
    /// unconfigured client fail at call time instead.
    pub fn from_env_or_default() -> Self {
        match Self::from_env() {
            Ok(config) => config,
            Err(e) => {
                log::error!(
                    "Missing or invalid provider configuration \
                     (FARESCOPE_BASE_URL, FARESCOPE_API_KEY, FARESCOPE_API_SECRET): {}",
                    e
                );
                Self::default()
            }
        }
    }

    /// Validates all configuration parameters.
    ///
    /// # Validation Rules
    /// - Credentials and base URL must be non-empty
    /// - Interval, backoff base and timeout must be positive
    /// - Expiry margin must be non-negative
    ///
    /// # Returns
    /// - Ok(()) if all validation passes
    /// - Err(message) with description of the first validation failure
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must be set".to_string());
        }
        if self.api_key.is_empty() {
            return Err("api_key must be set".to_string());
        }
        if self.api_secret.is_empty() {
            return Err("api_secret must be set".to_string());
        }
        if self.min_request_interval_ms == 0 {
            return Err("min_request_interval_ms must be positive".to_string());
        }
        if self.retry_base_delay_ms == 0 {
            return Err("retry_base_delay_ms must be positive".to_string());
        }
        if self.token_expiry_margin_secs < 0 {
            return Err("token_expiry_margin_secs must be non-negative".to_string());
        }
        if self.max_results == 0 {
            return Err("max_results must be positive".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be positive".to_string());
        }
        Ok(())
    }
}

/// Default values match the reference throttle/retry tuning; credentials
/// are intentionally empty and fail validation until provided.
impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            min_request_interval_ms: default_min_request_interval_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            token_expiry_margin_secs: default_token_expiry_margin_secs(),
            currency_code: default_currency_code(),
            max_results: default_max_results(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
