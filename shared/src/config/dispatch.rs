//! Delivery provider configuration

use serde::{Deserialize, Serialize};

/// Configuration for the code delivery gateway
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Provider name ("console", "twilio", "failover")
    pub provider: String,

    /// API key or account identifier for the provider
    pub api_key: String,

    /// API secret or auth token for the provider
    pub api_secret: String,

    /// Sender phone number in E.164 format (SMS/WhatsApp providers)
    pub from_number: String,

    /// Maximum retry attempts for transient provider failures
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled on each retry
    pub retry_delay_ms: u64,

    /// Timeout for a single provider API request in seconds
    pub request_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            provider: String::from("console"),
            api_key: String::new(),
            api_secret: String::new(),
            from_number: String::new(),
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl DispatchConfig {
    /// Build configuration from `DISPATCH_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("DISPATCH_PROVIDER").unwrap_or(defaults.provider),
            api_key: std::env::var("DISPATCH_API_KEY").unwrap_or(defaults.api_key),
            api_secret: std::env::var("DISPATCH_API_SECRET").unwrap_or(defaults.api_secret),
            from_number: std::env::var("DISPATCH_FROM_NUMBER").unwrap_or(defaults.from_number),
            max_retries: std::env::var("DISPATCH_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            retry_delay_ms: std::env::var("DISPATCH_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_delay_ms),
            request_timeout_secs: std::env::var("DISPATCH_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        }
    }
}
