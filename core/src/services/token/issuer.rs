//! Token issuer trait and JWT implementation

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::domain::entities::token::{Claims, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use vg_shared::config::TokenConfig;

/// Trait exchanging a verified user for a session token pair
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Issue an access/refresh token pair for the user
    async fn issue(&self, user: &User) -> Result<TokenPair, DomainError>;
}

/// HS256 JWT token issuer
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    config: TokenConfig,
}

impl JwtTokenIssuer {
    /// Creates a new issuer from token configuration
    pub fn new(config: TokenConfig) -> Self {
        if config.is_using_default_secret() {
            tracing::warn!(
                event = "default_jwt_secret",
                "Token issuer configured with the default secret"
            );
        }
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        Self {
            encoding_key,
            config,
        }
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            tracing::error!(
                error = %e,
                event = "token_generation_failed",
                "Failed to encode JWT"
            );
            DomainError::Token(TokenError::GenerationFailed)
        })
    }
}

#[async_trait]
impl TokenIssuer for JwtTokenIssuer {
    async fn issue(&self, user: &User) -> Result<TokenPair, DomainError> {
        let access_validity = Duration::minutes(self.config.access_token_expiry_minutes);
        let refresh_validity = Duration::days(self.config.refresh_token_expiry_days);

        let access_claims = Claims::new(user.id, &self.config.issuer, "access", access_validity);
        let refresh_claims = Claims::new(user.id, &self.config.issuer, "refresh", refresh_validity);

        let access = self.encode_claims(&access_claims)?;
        let refresh = self.encode_claims(&refresh_claims)?;

        Ok(TokenPair {
            access,
            refresh,
            access_expires_at: Utc::now() + access_validity,
        })
    }
}
