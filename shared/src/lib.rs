//! Shared utilities and common types for the VeriGate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types for the OTP engine, dispatch providers, and tokens
//! - Contact identifier validation and masking utilities

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{DatabaseConfig, DispatchConfig, OtpConfig, TokenConfig};
pub use utils::contact;
