//! End-to-end walkthrough against the in-memory store and console gateway.
//!
//! Issues a code (printed to this terminal by the console gateway), shows the
//! throttle kicking in on an immediate retry, then demonstrates a rejected
//! verification attempt.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p vg_infra --example console_flow
//! ```

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vg_core::domain::value_objects::Channel;
use vg_core::errors::{DomainError, VerificationError};
use vg_core::repositories::{InMemoryRequestStore, InMemoryUserLookup};
use vg_core::services::token::JwtTokenIssuer;
use vg_core::services::verification::VerificationEngine;
use vg_infra::dispatch::ConsoleGateway;
use vg_shared::config::{OtpConfig, TokenConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let otp_config = OtpConfig::from_env();
    let engine = VerificationEngine::new(
        Arc::new(InMemoryRequestStore::new()),
        Arc::new(ConsoleGateway::new(otp_config.expiry_minutes)),
        Arc::new(InMemoryUserLookup::new()),
        Arc::new(JwtTokenIssuer::new(TokenConfig::from_env())),
        otp_config,
    );

    let contact = "+14155550123";

    let outcome = engine.generate(contact, Channel::Sms).await?;
    println!("code issued, expires at {}", outcome.expires_at);

    match engine.generate(contact, Channel::Sms).await {
        Err(DomainError::Verification(VerificationError::Throttled {
            waiting_seconds, ..
        })) => println!("retry throttled for {waiting_seconds}s"),
        other => println!("unexpected retry outcome: {other:?}"),
    }

    match engine.verify(contact, "000000").await {
        Err(DomainError::Verification(VerificationError::InvalidCode {
            attempts_remaining,
        })) => println!("wrong code rejected, {attempts_remaining} attempts left"),
        other => println!("unexpected verify outcome: {other:?}"),
    }

    Ok(())
}
