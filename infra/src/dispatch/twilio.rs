//! Twilio dispatch gateway
//!
//! Sends verification codes over SMS and WhatsApp through the Twilio
//! Messages API, with automatic retry and exponential backoff.
//!
//! ## Features
//!
//! - SMS and WhatsApp delivery from one account
//! - Automatic retry logic with exponential backoff
//! - Rate limiting handling
//! - Security: contact masking in logs

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use vg_core::domain::value_objects::{Channel, Identifier};
use vg_core::services::verification::DispatchGateway;
use vg_shared::config::otp::DEFAULT_EXPIRY_MINUTES;
use vg_shared::utils::contact::mask_contact;

use super::code_message;
use crate::InfrastructureError;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Twilio gateway configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
    /// Maximum retry attempts for failed requests
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    /// Expiry stated in the message text, matching the engine's code TTL
    pub code_expiry_minutes: i64,
}

impl TwilioConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID")
            .map_err(|_| InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let from_number = std::env::var("TWILIO_FROM_NUMBER")
            .map_err(|_| InfrastructureError::Config("TWILIO_FROM_NUMBER not set".to_string()))?;

        if !from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        Ok(Self {
            account_sid,
            auth_token,
            from_number,
            max_retries: std::env::var("TWILIO_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_delay_ms: std::env::var("TWILIO_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            request_timeout_secs: std::env::var("TWILIO_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            code_expiry_minutes: std::env::var("OTP_EXPIRY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EXPIRY_MINUTES),
        })
    }
}

/// Subset of the Twilio message resource we care about
#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// Twilio dispatch gateway over the Messages REST API
pub struct TwilioGateway {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioGateway {
    /// Create a new Twilio gateway
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        if config.account_sid.is_empty() || config.auth_token.is_empty() {
            return Err(InfrastructureError::Config(
                "Twilio credentials are not configured".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(InfrastructureError::Http)?;

        info!(
            from_number = %mask_contact(&config.from_number),
            "Twilio dispatch gateway initialized"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(TwilioConfig::from_env()?)
    }

    /// Address pair for a channel; WhatsApp rides over Twilio with an
    /// address prefix
    fn address_pair(&self, identifier: &Identifier) -> Result<(String, String), InfrastructureError> {
        match identifier.channel() {
            Channel::Sms => Ok((
                self.config.from_number.clone(),
                identifier.contact().to_string(),
            )),
            Channel::Whatsapp => Ok((
                format!("whatsapp:{}", self.config.from_number),
                format!("whatsapp:{}", identifier.contact()),
            )),
            Channel::Email => Err(InfrastructureError::Dispatch(
                "Twilio gateway does not deliver email".to_string(),
            )),
        }
    }

    async fn post_message(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<reqwest::Response, InfrastructureError> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.account_sid
        );
        let params = [("From", from), ("To", to), ("Body", body)];

        self.client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(InfrastructureError::Http)
    }

    /// Send a message with retry logic
    async fn send_with_retry(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                attempt = attempts,
                max_retries = self.config.max_retries,
                to = %mask_contact(to),
                "Sending message via Twilio"
            );

            let result = self.post_message(from, to, body).await;

            let retryable = match result {
                Ok(response) if response.status().is_success() => {
                    let message: MessageResponse =
                        response.json().await.map_err(InfrastructureError::Http)?;
                    info!(
                        to = %mask_contact(to),
                        sid = %message.sid,
                        "Message accepted by Twilio"
                    );
                    return Ok(message.sid);
                }
                Ok(response) => {
                    let status = response.status();
                    let detail = response
                        .json::<ErrorResponse>()
                        .await
                        .ok()
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| status.to_string());

                    // Client errors other than rate limiting will not heal
                    // on retry.
                    if status.is_client_error() && status.as_u16() != 429 {
                        return Err(InfrastructureError::Dispatch(format!(
                            "Twilio rejected the message: {}",
                            detail
                        )));
                    }

                    if status.as_u16() == 429 {
                        warn!(delay = ?delay, "Twilio rate limit hit, backing off");
                    } else {
                        warn!(status = %status, delay = ?delay, "Twilio server error, retrying");
                    }
                    detail
                }
                Err(e) => {
                    error!(
                        attempt = attempts,
                        error = %e,
                        "Twilio request failed"
                    );
                    e.to_string()
                }
            };

            if attempts >= self.config.max_retries {
                return Err(InfrastructureError::Dispatch(format!(
                    "Failed to send message after {} attempts: {}",
                    self.config.max_retries, retryable
                )));
            }

            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

#[async_trait]
impl DispatchGateway for TwilioGateway {
    async fn send(&self, identifier: &Identifier, code: &str) -> Result<String, String> {
        let (from, to) = self.address_pair(identifier).map_err(|e| e.to_string())?;
        let body = code_message(code, self.config.code_expiry_minutes);

        self.send_with_retry(&from, &to, &body)
            .await
            .map_err(|e| e.to_string())
    }
}
