//! Domain-specific error types and error handling.
//!
//! Every engine-level failure is a member of a closed enum so that callers
//! handle outcomes exhaustively. Only genuine infrastructure failures
//! (`StoreUnavailable`, `Internal`) represent faults; the rest are ordinary
//! protocol outcomes with actionable payloads.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Verification lifecycle errors
///
/// One variant per user-visible failure of the generate/verify flow.
/// `AttemptsExhausted` and `ExpiredRequest` deliberately carry no hint of
/// whether the submitted code was correct.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Invalid identifier: {reason}")]
    InvalidIdentifier { reason: String },

    #[error("Please wait {waiting_seconds} seconds before requesting a new code")]
    Throttled {
        waiting_seconds: u64,
        next_allowed_at: DateTime<Utc>,
    },

    #[error("Failed to send the verification code. Please try again later")]
    DispatchFailure,

    #[error("No active verification request found. Please request a new code")]
    NotFoundActiveRequest,

    #[error("Verification code has expired. Please request a new code")]
    ExpiredRequest,

    #[error("Maximum verification attempts reached. Please request a new code")]
    AttemptsExhausted,

    #[error("Invalid code. {attempts_remaining} attempts remaining")]
    InvalidCode { attempts_remaining: u32 },

    #[error("Verification store unavailable: {message}")]
    StoreUnavailable { message: String },
}

/// Token issuance errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token generation failed")]
    GenerationFailed,
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Returns the verification error inside, if this is one
    pub fn as_verification(&self) -> Option<&VerificationError> {
        match self {
            DomainError::Verification(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttled_message_includes_wait() {
        let err = VerificationError::Throttled {
            waiting_seconds: 5,
            next_allowed_at: Utc::now(),
        };
        assert!(err.to_string().contains("5 seconds"));
    }

    #[test]
    fn invalid_code_message_includes_remaining() {
        let err = VerificationError::InvalidCode {
            attempts_remaining: 2,
        };
        assert!(err.to_string().contains("2 attempts"));
    }

    #[test]
    fn exhausted_message_reveals_nothing_about_the_code() {
        let msg = VerificationError::AttemptsExhausted.to_string();
        assert!(!msg.to_lowercase().contains("invalid"));
        assert!(!msg.to_lowercase().contains("correct"));
    }

    #[test]
    fn domain_error_bridges_verification() {
        let err: DomainError = VerificationError::NotFoundActiveRequest.into();
        assert!(matches!(
            err.as_verification(),
            Some(VerificationError::NotFoundActiveRequest)
        ));
    }
}
