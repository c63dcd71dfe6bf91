//! Verification service module for multi-channel OTP authentication
//!
//! This module provides the complete verification code workflow:
//! - Secure code generation and hashing
//! - Progressive request throttling with a configurable backoff table
//! - Dispatch over injected delivery gateways (SMS, email, chat)
//! - Code verification with bounded attempt tracking
//! - Session token issuance for verified accounts

mod code_generator;
mod engine;
mod throttle;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use code_generator::CodeGenerator;
pub use engine::VerificationEngine;
pub use throttle::{ThrottleDecision, ThrottlePolicy};
pub use traits::DispatchGateway;
pub use types::{GenerateOutcome, VerifiedOutcome};
