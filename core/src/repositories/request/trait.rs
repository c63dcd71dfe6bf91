//! Request store trait defining the interface for verification request
//! persistence.
//!
//! The store is the only shared mutable resource of the verification engine.
//! All cross-call coordination goes through the atomic operations below, so
//! the engine stays correct under multi-process deployment; no in-process
//! locking is layered on top.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_request::VerificationRequest;
use crate::domain::value_objects::{Channel, CodeHash};
use crate::errors::DomainError;

/// Outcome of the atomic attempt-and-maybe-consume operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Code matched within limits; the request is now `Consumed`
    Consumed,
    /// Code did not match; attempt slots remain
    Rejected { attempts_remaining: u32 },
    /// The final attempt slot was reached; the comparison result is not
    /// honored past this boundary
    Exhausted,
    /// The request expired before the attempt committed
    Expired,
    /// The request is no longer pending (consumed or superseded)
    NotActive,
}

/// Throttle bookkeeping for an identifier, derived from its request history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleLedger {
    /// Sequence number of the most recent request
    pub generation_sequence: u32,
    /// When that request was created
    pub last_request_at: DateTime<Utc>,
}

/// Repository trait for verification request persistence
///
/// Implementations must make each operation atomic: concurrent
/// `supersede_and_create` calls for one identifier serialize, and concurrent
/// `increment_attempt_and_maybe_consume` calls for one request can never both
/// consume it or push `attempts_used` past the maximum.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Atomically supersedes any pending request for the identifier and
    /// inserts a new pending request with the next generation sequence
    async fn supersede_and_create(
        &self,
        identifier: &str,
        channel: Channel,
        code_hash: CodeHash,
        ttl: Duration,
        max_attempts: u32,
    ) -> Result<VerificationRequest, DomainError>;

    /// Returns the current pending request for the identifier, if any
    ///
    /// A pending request past its expiry is still returned; classifying it
    /// as expired is the caller's concern.
    async fn load_active(&self, identifier: &str)
        -> Result<Option<VerificationRequest>, DomainError>;

    /// Atomically consumes one attempt slot and, when the code matched
    /// within limits, transitions the request to `Consumed`
    ///
    /// The update is all-or-nothing: a cancelled caller can never leave a
    /// partially counted attempt behind.
    async fn increment_attempt_and_maybe_consume(
        &self,
        request_id: Uuid,
        code_matches: bool,
    ) -> Result<AttemptOutcome, DomainError>;

    /// Returns the throttle ledger for the identifier, or `None` when no
    /// requests have been issued
    async fn throttle_state(&self, identifier: &str) -> Result<Option<ThrottleLedger>, DomainError>;

    /// Removes a request whose dispatch failed, reverting the identifier's
    /// ledger as if it was never issued
    async fn discard(&self, request_id: Uuid) -> Result<(), DomainError>;
}
