//! MySQL implementation of the RequestStore trait.
//!
//! Every trait operation runs inside a transaction with `SELECT ... FOR
//! UPDATE` row locks, so the store's atomicity contract holds across
//! processes: concurrent creates for one identifier serialize, and
//! concurrent attempts can never over-consume a request.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use vg_core::domain::entities::verification_request::{RequestState, VerificationRequest};
use vg_core::domain::value_objects::{Channel, CodeHash};
use vg_core::errors::{DomainError, VerificationError};
use vg_core::repositories::{AttemptOutcome, RequestStore, ThrottleLedger};

/// MySQL implementation of RequestStore
pub struct MySqlRequestStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRequestStore {
    /// Create a new MySQL request store
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Query or connection failure; the store itself is at fault
    fn unavailable(context: &str, e: sqlx::Error) -> DomainError {
        VerificationError::StoreUnavailable {
            message: format!("{}: {}", context, e),
        }
        .into()
    }

    fn internal(context: &str, e: impl std::fmt::Display) -> DomainError {
        DomainError::Internal {
            message: format!("{}: {}", context, e),
        }
    }

    fn parse_state(state: &str) -> Result<RequestState, DomainError> {
        match state {
            "pending" => Ok(RequestState::Pending),
            "consumed" => Ok(RequestState::Consumed),
            "superseded" => Ok(RequestState::Superseded),
            "expired" => Ok(RequestState::Expired),
            other => Err(DomainError::Internal {
                message: format!("Unknown request state in database: {}", other),
            }),
        }
    }

    /// Convert a database row to a VerificationRequest entity
    fn row_to_request(row: &sqlx::mysql::MySqlRow) -> Result<VerificationRequest, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| Self::internal("Failed to get id", e))?;
        let channel: String = row
            .try_get("channel")
            .map_err(|e| Self::internal("Failed to get channel", e))?;
        let state: String = row
            .try_get("state")
            .map_err(|e| Self::internal("Failed to get state", e))?;
        let code_hash: String = row
            .try_get("code_hash")
            .map_err(|e| Self::internal("Failed to get code_hash", e))?;

        Ok(VerificationRequest {
            id: Uuid::parse_str(&id).map_err(|e| Self::internal("Invalid request UUID", e))?,
            identifier: row
                .try_get("identifier")
                .map_err(|e| Self::internal("Failed to get identifier", e))?,
            channel: channel
                .parse::<Channel>()
                .map_err(|e| Self::internal("Invalid channel in database", e))?,
            code_hash: CodeHash::from_stored(code_hash),
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| Self::internal("Failed to get created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| Self::internal("Failed to get expires_at", e))?,
            attempts_used: row
                .try_get("attempts_used")
                .map_err(|e| Self::internal("Failed to get attempts_used", e))?,
            max_attempts: row
                .try_get("max_attempts")
                .map_err(|e| Self::internal("Failed to get max_attempts", e))?,
            generation_sequence: row
                .try_get("generation_sequence")
                .map_err(|e| Self::internal("Failed to get generation_sequence", e))?,
            state: Self::parse_state(&state)?,
        })
    }
}

#[async_trait]
impl RequestStore for MySqlRequestStore {
    async fn supersede_and_create(
        &self,
        identifier: &str,
        channel: Channel,
        code_hash: CodeHash,
        ttl: Duration,
        max_attempts: u32,
    ) -> Result<VerificationRequest, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::unavailable("Failed to begin transaction", e))?;

        // Lock the identifier's rows so concurrent creates serialize.
        let sequence_row = sqlx::query(
            "SELECT CAST(COALESCE(MAX(generation_sequence), 0) AS SIGNED) AS seq \
             FROM verification_requests WHERE identifier = ? FOR UPDATE",
        )
        .bind(identifier)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Self::unavailable("Failed to read generation sequence", e))?;

        let sequence: u32 = sequence_row
            .try_get::<i64, _>("seq")
            .map_err(|e| Self::internal("Failed to get generation sequence", e))?
            as u32
            + 1;

        sqlx::query(
            "UPDATE verification_requests SET state = 'superseded' \
             WHERE identifier = ? AND state = 'pending'",
        )
        .bind(identifier)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::unavailable("Failed to supersede pending requests", e))?;

        let mut request = VerificationRequest::new(
            identifier.to_string(),
            channel,
            code_hash,
            ttl,
            max_attempts,
            sequence,
        );
        // MySQL TIMESTAMP(3) truncates to milliseconds; keep the entity and
        // the stored row identical.
        request.created_at = request.created_at.trunc_subsecs(3);
        request.expires_at = request.expires_at.trunc_subsecs(3);

        sqlx::query(
            "INSERT INTO verification_requests ( \
                id, identifier, channel, code_hash, created_at, expires_at, \
                attempts_used, max_attempts, generation_sequence, state \
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.id.to_string())
        .bind(&request.identifier)
        .bind(request.channel.as_str())
        .bind(request.code_hash.as_str())
        .bind(request.created_at)
        .bind(request.expires_at)
        .bind(request.attempts_used)
        .bind(request.max_attempts)
        .bind(request.generation_sequence)
        .bind(request.state.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::unavailable("Failed to insert verification request", e))?;

        tx.commit()
            .await
            .map_err(|e| Self::unavailable("Failed to commit transaction", e))?;

        Ok(request)
    }

    async fn load_active(
        &self,
        identifier: &str,
    ) -> Result<Option<VerificationRequest>, DomainError> {
        let row = sqlx::query(
            "SELECT id, identifier, channel, code_hash, created_at, expires_at, \
                    attempts_used, max_attempts, generation_sequence, state \
             FROM verification_requests \
             WHERE identifier = ? AND state = 'pending' \
             ORDER BY generation_sequence DESC LIMIT 1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::unavailable("Failed to load active request", e))?;

        row.as_ref().map(Self::row_to_request).transpose()
    }

    async fn increment_attempt_and_maybe_consume(
        &self,
        request_id: Uuid,
        code_matches: bool,
    ) -> Result<AttemptOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::unavailable("Failed to begin transaction", e))?;

        let row = sqlx::query(
            "SELECT id, identifier, channel, code_hash, created_at, expires_at, \
                    attempts_used, max_attempts, generation_sequence, state \
             FROM verification_requests WHERE id = ? FOR UPDATE",
        )
        .bind(request_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| Self::unavailable("Failed to lock request row", e))?;

        let Some(row) = row else {
            tx.rollback()
                .await
                .map_err(|e| Self::unavailable("Failed to roll back transaction", e))?;
            return Ok(AttemptOutcome::NotActive);
        };
        let request = Self::row_to_request(&row)?;

        if request.state != RequestState::Pending {
            tx.rollback()
                .await
                .map_err(|e| Self::unavailable("Failed to roll back transaction", e))?;
            return Ok(AttemptOutcome::NotActive);
        }

        if Utc::now() > request.expires_at {
            sqlx::query("UPDATE verification_requests SET state = 'expired' WHERE id = ?")
                .bind(request_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| Self::unavailable("Failed to expire request", e))?;
            tx.commit()
                .await
                .map_err(|e| Self::unavailable("Failed to commit transaction", e))?;
            return Ok(AttemptOutcome::Expired);
        }

        if request.attempts_used >= request.max_attempts {
            tx.rollback()
                .await
                .map_err(|e| Self::unavailable("Failed to roll back transaction", e))?;
            return Ok(AttemptOutcome::Exhausted);
        }

        let attempts_used = request.attempts_used + 1;

        // The final attempt slot is the exhaustion boundary: once it is
        // reached the comparison result is no longer honored.
        let (state, outcome) = if attempts_used >= request.max_attempts {
            (RequestState::Pending, AttemptOutcome::Exhausted)
        } else if code_matches {
            (RequestState::Consumed, AttemptOutcome::Consumed)
        } else {
            (
                RequestState::Pending,
                AttemptOutcome::Rejected {
                    attempts_remaining: request.max_attempts - attempts_used,
                },
            )
        };

        sqlx::query("UPDATE verification_requests SET attempts_used = ?, state = ? WHERE id = ?")
            .bind(attempts_used)
            .bind(state.as_str())
            .bind(request_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::unavailable("Failed to commit attempt", e))?;

        tx.commit()
            .await
            .map_err(|e| Self::unavailable("Failed to commit transaction", e))?;

        Ok(outcome)
    }

    async fn throttle_state(
        &self,
        identifier: &str,
    ) -> Result<Option<ThrottleLedger>, DomainError> {
        let row = sqlx::query(
            "SELECT generation_sequence, created_at FROM verification_requests \
             WHERE identifier = ? ORDER BY generation_sequence DESC LIMIT 1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::unavailable("Failed to read throttle state", e))?;

        row.map(|row| {
            Ok(ThrottleLedger {
                generation_sequence: row
                    .try_get("generation_sequence")
                    .map_err(|e| Self::internal("Failed to get generation_sequence", e))?,
                last_request_at: row
                    .try_get::<DateTime<Utc>, _>("created_at")
                    .map_err(|e| Self::internal("Failed to get created_at", e))?,
            })
        })
        .transpose()
    }

    async fn discard(&self, request_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM verification_requests WHERE id = ?")
            .bind(request_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::unavailable("Failed to discard request", e))?;
        Ok(())
    }
}
