//! Verification request entity for OTP-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{Channel, CodeHash};

/// Lifecycle state of a verification request
///
/// `Pending` is the only non-terminal state. A new request for the same
/// identifier supersedes the pending one; consumption requires a matching
/// code before expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    /// Awaiting verification
    Pending,
    /// Successfully verified with a matching code
    Consumed,
    /// Replaced by a newer request for the same identifier
    Superseded,
    /// Expired without being consumed
    Expired,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Pending => "pending",
            RequestState::Consumed => "consumed",
            RequestState::Superseded => "superseded",
            RequestState::Expired => "expired",
        }
    }
}

/// A single OTP verification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Unique identifier for the request
    pub id: Uuid,

    /// Normalized contact string this code was sent to
    pub identifier: String,

    /// Delivery channel the code travels over
    pub channel: Channel,

    /// Salted hash of the code; the plaintext is never persisted
    pub code_hash: CodeHash,

    /// Timestamp when the request was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Number of verification attempts consumed so far
    pub attempts_used: u32,

    /// Maximum number of verification attempts allowed
    pub max_attempts: u32,

    /// 1-based ordinal of this request among all requests for the identifier
    pub generation_sequence: u32,

    /// Current lifecycle state
    pub state: RequestState,
}

impl VerificationRequest {
    /// Creates a new pending request
    pub fn new(
        identifier: String,
        channel: Channel,
        code_hash: CodeHash,
        ttl: Duration,
        max_attempts: u32,
        generation_sequence: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            identifier,
            channel,
            code_hash,
            created_at: now,
            expires_at: now + ttl,
            attempts_used: 0,
            max_attempts,
            generation_sequence,
            state: RequestState::Pending,
        }
    }

    /// Checks if the request has passed its expiry timestamp
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks if the request is still awaiting verification
    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }

    /// Number of attempt slots left before exhaustion
    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts_used)
    }

    /// Checks if every attempt slot has been consumed
    pub fn attempts_exhausted(&self) -> bool {
        self.attempts_used >= self.max_attempts
    }
}
