//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the VeriGate backend.
//! It provides concrete implementations for the persistence and delivery
//! seams the core verification engine is generic over.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL implementations of the request store and user
//!   lookup using SQLx
//! - **Dispatch**: Delivery gateway implementations (Twilio, console) with
//!   automatic failover

// Re-export core error types for convenience
pub use vg_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Dispatch module - Delivery gateway providers
pub mod dispatch;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Delivery provider error
    #[error("Dispatch error: {0}")]
    Dispatch(String),
}
