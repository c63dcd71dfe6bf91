//! # VeriGate Core
//!
//! Core business logic and domain layer for the VeriGate backend.
//! This crate contains domain entities, the OTP verification engine,
//! repository interfaces, and error types that form the foundation of the
//! application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    Channel, Claims, CodeHash, Identifier, RequestState, TokenPair, User, VerificationRequest,
};
pub use errors::{DomainError, DomainResult, TokenError, VerificationError};
pub use repositories::{
    AttemptOutcome, InMemoryRequestStore, InMemoryUserLookup, RequestStore, ThrottleLedger,
    UserLookup,
};
pub use services::{
    CodeGenerator, DispatchGateway, GenerateOutcome, JwtTokenIssuer, ThrottleDecision,
    ThrottlePolicy, TokenIssuer, VerificationEngine, VerifiedOutcome,
};
