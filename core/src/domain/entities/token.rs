//! Token entities for JWT-based session issuance.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Token use: "access" or "refresh"
    pub token_use: String,
}

impl Claims {
    /// Creates claims for a token expiring after the given duration
    pub fn new(user_id: Uuid, issuer: &str, token_use: &str, validity: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + validity).timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_use: token_use.to_string(),
        }
    }
}

/// Access and refresh token pair returned after successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token
    pub access: String,

    /// Long-lived refresh token
    pub refresh: String,

    /// Expiry of the access token
    pub access_expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_carry_subject_and_use() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "verigate", "access", Duration::minutes(15));
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_use, "access");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn each_token_gets_a_unique_jti() {
        let user_id = Uuid::new_v4();
        let a = Claims::new(user_id, "verigate", "access", Duration::minutes(15));
        let b = Claims::new(user_id, "verigate", "access", Duration::minutes(15));
        assert_ne!(a.jti, b.jti);
    }
}
