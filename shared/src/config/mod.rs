//! Configuration module with business-specific sub-modules
//!
//! Configuration is organized into logical areas:
//! - `otp` - OTP lifecycle configuration (expiry, attempts, backoff table)
//! - `dispatch` - Delivery provider configuration (SMS/email/chat)
//! - `token` - JWT token issuance configuration
//! - `database` - Connection pool configuration
//!
//! All values are externally supplied; core logic never reads ambient
//! defaults on its own.

pub mod database;
pub mod dispatch;
pub mod otp;
pub mod token;

pub use database::DatabaseConfig;
pub use dispatch::DispatchConfig;
pub use otp::OtpConfig;
pub use token::TokenConfig;
