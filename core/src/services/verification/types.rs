//! Types for verification engine results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;

/// Result of successfully generating and dispatching a code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOutcome {
    /// When the issued code expires
    pub expires_at: DateTime<Utc>,
    /// Earliest instant a follow-up code may be requested; omitted on the
    /// first-ever request for an identifier
    pub next_allowed_at: Option<DateTime<Utc>>,
}

/// Result of a successful verification
///
/// Verification proves control of the contact identifier whether or not an
/// account exists for it; a missing account is a soft outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerifiedOutcome {
    /// An account exists for the identifier; session tokens were issued
    SignedIn { user: User, tokens: TokenPair },
    /// The identifier is verified but no account is registered for it
    NoAccount,
}

impl VerifiedOutcome {
    /// Tokens issued with this outcome, if any
    pub fn tokens(&self) -> Option<&TokenPair> {
        match self {
            VerifiedOutcome::SignedIn { tokens, .. } => Some(tokens),
            VerifiedOutcome::NoAccount => None,
        }
    }
}
