//! Dispatch module - Delivery gateway providers
//!
//! This module provides delivery gateway implementations for sending
//! verification codes. It includes support for Twilio (SMS and WhatsApp),
//! a console gateway for development, and an automatic failover wrapper.
//!
//! Codes are dispatched through the core `DispatchGateway` trait; providers
//! here translate their own errors into the gateway's error strings so the
//! verification engine never depends on a concrete provider.

use std::sync::Arc;

use vg_core::services::verification::DispatchGateway;
use vg_shared::config::DispatchConfig;

pub mod console;
pub mod failover;
pub mod twilio;

// Re-export commonly used types
pub use console::ConsoleGateway;
pub use failover::FailoverGateway;
pub use twilio::{TwilioConfig, TwilioGateway};

/// Text of the message carrying a verification code
pub(crate) fn code_message(code: &str, expiry_minutes: i64) -> String {
    format!(
        "Your VeriGate verification code is {}. It expires in {} minutes. \
         Do not share this code with anyone.",
        code, expiry_minutes
    )
}

/// Create a dispatch gateway based on configuration
///
/// `code_expiry_minutes` is the engine's configured code TTL, stated in the
/// delivered message text. Returns the provider named by `config.provider`;
/// unknown providers fall back to the console gateway so development setups
/// work out of the box.
pub fn create_dispatch_gateway(
    config: &DispatchConfig,
    code_expiry_minutes: i64,
) -> Arc<dyn DispatchGateway> {
    match config.provider.as_str() {
        "console" => Arc::new(ConsoleGateway::new(code_expiry_minutes)),
        "twilio" => {
            let twilio_config = TwilioConfig {
                account_sid: config.api_key.clone(),
                auth_token: config.api_secret.clone(),
                from_number: config.from_number.clone(),
                max_retries: config.max_retries,
                retry_delay_ms: config.retry_delay_ms,
                request_timeout_secs: config.request_timeout_secs,
                code_expiry_minutes,
            };
            match TwilioGateway::new(twilio_config) {
                Ok(gateway) => Arc::new(gateway),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to initialize Twilio gateway");
                    tracing::warn!("Falling back to console gateway");
                    Arc::new(ConsoleGateway::new(code_expiry_minutes))
                }
            }
        }
        "failover" => {
            let primary: Arc<dyn DispatchGateway> = match TwilioGateway::from_env() {
                Ok(gateway) => Arc::new(gateway),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to initialize Twilio gateway");
                    tracing::warn!("Failover primary unavailable, using console gateway");
                    Arc::new(ConsoleGateway::new(code_expiry_minutes))
                }
            };
            Arc::new(FailoverGateway::new(
                primary,
                Arc::new(ConsoleGateway::new(code_expiry_minutes)),
                std::time::Duration::from_secs(60),
            ))
        }
        other => {
            tracing::warn!(
                provider = other,
                "Unknown dispatch provider, using console gateway"
            );
            Arc::new(ConsoleGateway::new(code_expiry_minutes))
        }
    }
}
