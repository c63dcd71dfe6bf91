//! MySQL implementation of the UserLookup trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use vg_core::domain::entities::user::User;
use vg_core::errors::{DomainError, VerificationError};
use vg_core::repositories::UserLookup;

/// MySQL implementation of UserLookup
pub struct MySqlUserLookup {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserLookup {
    /// Create a new MySQL user lookup
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn internal(context: &str, e: impl std::fmt::Display) -> DomainError {
        DomainError::Internal {
            message: format!("{}: {}", context, e),
        }
    }

    /// Convert a database row to a User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| Self::internal("Failed to get id", e))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| Self::internal("Invalid user UUID", e))?,
            email: row
                .try_get("email")
                .map_err(|e| Self::internal("Failed to get email", e))?,
            phone_number: row
                .try_get("phone_number")
                .map_err(|e| Self::internal("Failed to get phone_number", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| Self::internal("Failed to get created_at", e))?,
            is_verified: row
                .try_get("is_verified")
                .map_err(|e| Self::internal("Failed to get is_verified", e))?,
        })
    }
}

#[async_trait]
impl UserLookup for MySqlUserLookup {
    async fn find_by_contact(&self, contact: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, email, phone_number, created_at, is_verified \
             FROM users WHERE email = ? OR phone_number = ? LIMIT 1",
        )
        .bind(contact)
        .bind(contact)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::from(VerificationError::StoreUnavailable {
                message: format!("Failed to look up user: {}", e),
            })
        })?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}
