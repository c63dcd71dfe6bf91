//! In-memory implementation of the request store
//!
//! Backs single-process deployments and the test suites. A single `RwLock`
//! over the request map makes every trait operation atomic; multi-process
//! deployments use the database-backed store instead.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::verification_request::{RequestState, VerificationRequest};
use crate::domain::value_objects::{Channel, CodeHash};
use crate::errors::DomainError;

use super::trait_::{AttemptOutcome, RequestStore, ThrottleLedger};

/// In-memory request store keyed by normalized contact identifier
pub struct InMemoryRequestStore {
    requests: Arc<RwLock<HashMap<String, Vec<VerificationRequest>>>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of requests currently held for an identifier, all states
    /// included. Test helper.
    pub async fn request_count(&self, identifier: &str) -> usize {
        let requests = self.requests.read().await;
        requests.get(identifier).map(|v| v.len()).unwrap_or(0)
    }

    /// Snapshot of every request for an identifier. Test helper.
    pub async fn history(&self, identifier: &str) -> Vec<VerificationRequest> {
        let requests = self.requests.read().await;
        requests.get(identifier).cloned().unwrap_or_default()
    }
}

impl Default for InMemoryRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn supersede_and_create(
        &self,
        identifier: &str,
        channel: Channel,
        code_hash: CodeHash,
        ttl: Duration,
        max_attempts: u32,
    ) -> Result<VerificationRequest, DomainError> {
        let mut requests = self.requests.write().await;
        let history = requests.entry(identifier.to_string()).or_default();

        for existing in history.iter_mut() {
            if existing.state == RequestState::Pending {
                existing.state = RequestState::Superseded;
            }
        }

        let sequence = history
            .iter()
            .map(|r| r.generation_sequence)
            .max()
            .unwrap_or(0)
            + 1;

        let request = VerificationRequest::new(
            identifier.to_string(),
            channel,
            code_hash,
            ttl,
            max_attempts,
            sequence,
        );
        history.push(request.clone());

        Ok(request)
    }

    async fn load_active(
        &self,
        identifier: &str,
    ) -> Result<Option<VerificationRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.get(identifier).and_then(|history| {
            history
                .iter()
                .rev()
                .find(|r| r.state == RequestState::Pending)
                .cloned()
        }))
    }

    async fn increment_attempt_and_maybe_consume(
        &self,
        request_id: Uuid,
        code_matches: bool,
    ) -> Result<AttemptOutcome, DomainError> {
        let mut requests = self.requests.write().await;
        let Some(request) = requests
            .values_mut()
            .flat_map(|history| history.iter_mut())
            .find(|r| r.id == request_id)
        else {
            return Ok(AttemptOutcome::NotActive);
        };

        if request.state != RequestState::Pending {
            return Ok(AttemptOutcome::NotActive);
        }
        if Utc::now() > request.expires_at {
            request.state = RequestState::Expired;
            return Ok(AttemptOutcome::Expired);
        }
        if request.attempts_used >= request.max_attempts {
            return Ok(AttemptOutcome::Exhausted);
        }

        request.attempts_used += 1;

        // The final attempt slot is the exhaustion boundary: once it is
        // reached the comparison result is no longer honored, so an
        // exhausted response never reveals whether the code was correct.
        if request.attempts_used >= request.max_attempts {
            return Ok(AttemptOutcome::Exhausted);
        }

        if code_matches {
            request.state = RequestState::Consumed;
            Ok(AttemptOutcome::Consumed)
        } else {
            Ok(AttemptOutcome::Rejected {
                attempts_remaining: request.max_attempts - request.attempts_used,
            })
        }
    }

    async fn throttle_state(
        &self,
        identifier: &str,
    ) -> Result<Option<ThrottleLedger>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.get(identifier).and_then(|history| {
            history
                .iter()
                .max_by_key(|r| r.generation_sequence)
                .map(|r| ThrottleLedger {
                    generation_sequence: r.generation_sequence,
                    last_request_at: r.created_at,
                })
        }))
    }

    async fn discard(&self, request_id: Uuid) -> Result<(), DomainError> {
        let mut requests = self.requests.write().await;
        for history in requests.values_mut() {
            history.retain(|r| r.id != request_id);
        }
        requests.retain(|_, history| !history.is_empty());
        Ok(())
    }
}
