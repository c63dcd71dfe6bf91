//! Main verification engine implementation

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use crate::domain::value_objects::{Channel, Identifier};
use crate::errors::{DomainResult, VerificationError};
use crate::repositories::request::{AttemptOutcome, RequestStore};
use crate::repositories::user::UserLookup;
use crate::services::token::TokenIssuer;
use vg_shared::config::OtpConfig;
use vg_shared::utils::contact::mask_contact;

use super::code_generator::CodeGenerator;
use super::throttle::ThrottlePolicy;
use super::traits::DispatchGateway;
use super::types::{GenerateOutcome, VerifiedOutcome};

/// Verification engine owning the OTP request state machine
///
/// The engine performs no internal parallelism; all cross-call coordination
/// goes through the request store's atomic operations, so correctness holds
/// under concurrent invocations and multi-process deployment.
pub struct VerificationEngine<R, G, U, T>
where
    R: RequestStore,
    G: DispatchGateway,
    U: UserLookup,
    T: TokenIssuer,
{
    /// Request store, the single shared mutable resource
    store: Arc<R>,
    /// Delivery gateway for dispatching plaintext codes
    gateway: Arc<G>,
    /// Account lookup consulted after successful verification
    users: Arc<U>,
    /// Session token issuer for verified accounts
    tokens: Arc<T>,
    /// Throttling policy over the configured backoff table
    policy: ThrottlePolicy,
    /// Code generator for the configured code length
    generator: CodeGenerator,
    /// Engine configuration, injected once at construction
    config: OtpConfig,
}

impl<R, G, U, T> VerificationEngine<R, G, U, T>
where
    R: RequestStore,
    G: DispatchGateway,
    U: UserLookup,
    T: TokenIssuer,
{
    /// Creates a new verification engine
    pub fn new(
        store: Arc<R>,
        gateway: Arc<G>,
        users: Arc<U>,
        tokens: Arc<T>,
        config: OtpConfig,
    ) -> Self {
        let policy = ThrottlePolicy::new(config.waiting_periods.clone());
        let generator = CodeGenerator::new(config.code_length);
        Self {
            store,
            gateway,
            users,
            tokens,
            policy,
            generator,
            config,
        }
    }

    /// Generate a verification code for a contact and dispatch it
    ///
    /// 1. Validates and normalizes the contact for the channel
    /// 2. Judges the request against the progressive backoff table
    /// 3. Atomically supersedes any pending request and creates the new one
    /// 4. Dispatches the plaintext code with a bounded timeout; a failed
    ///    dispatch discards the request so it never lingers as a live OTP
    pub async fn generate(&self, contact: &str, channel: Channel) -> DomainResult<GenerateOutcome> {
        let identifier = Identifier::new(contact, channel)?;

        let ledger = self.store.throttle_state(identifier.contact()).await?;
        let next_sequence = ledger.map(|l| l.generation_sequence + 1).unwrap_or(1);
        let decision = self.policy.check(
            next_sequence,
            ledger.map(|l| l.last_request_at),
            Utc::now(),
        );
        if !decision.allowed {
            tracing::warn!(
                identifier = %identifier.masked(),
                waiting_seconds = decision.waiting_seconds,
                event = "throttle_rejected",
                "Verification code request rejected by throttle policy"
            );
            return Err(VerificationError::Throttled {
                waiting_seconds: decision.waiting_seconds,
                // check() always yields an instant when a previous request exists
                next_allowed_at: decision.next_allowed_at.unwrap_or_else(Utc::now),
            }
            .into());
        }

        let (code, code_hash) = self.generator.generate();

        let request = self
            .store
            .supersede_and_create(
                identifier.contact(),
                channel,
                code_hash,
                Duration::minutes(self.config.expiry_minutes),
                self.config.max_attempts,
            )
            .await?;

        tracing::info!(
            identifier = %identifier.masked(),
            channel = %channel,
            sequence = request.generation_sequence,
            event = "otp_generated",
            "Generated new verification code"
        );

        let dispatch = tokio::time::timeout(
            StdDuration::from_secs(self.config.dispatch_timeout_secs),
            self.gateway.send(&identifier, &code),
        )
        .await;

        let message_id = match dispatch {
            Ok(Ok(message_id)) => message_id,
            Ok(Err(error)) => {
                return self.fail_dispatch(&identifier, request.id, &error).await;
            }
            Err(_) => {
                return self
                    .fail_dispatch(&identifier, request.id, "dispatch timed out")
                    .await;
            }
        };

        tracing::info!(
            identifier = %identifier.masked(),
            channel = %channel,
            message_id = %message_id,
            event = "otp_dispatched",
            "Verification code dispatched"
        );

        // The next request's wait is indexed by the sequence after this one;
        // a first-ever request reports no next_allowed_at.
        let next_allowed_at = if request.generation_sequence == 1 {
            None
        } else {
            let wait = self
                .policy
                .wait_for_sequence(request.generation_sequence + 1);
            Some(request.created_at + Duration::seconds(wait as i64))
        };

        Ok(GenerateOutcome {
            expires_at: request.expires_at,
            next_allowed_at,
        })
    }

    /// Verify a submitted code for a contact
    ///
    /// Expiry takes precedence over the attempts check, and both take
    /// precedence over code comparison, so an expired or exhausted request
    /// never leaks whether the submitted code was correct. The comparison is
    /// constant-time; the attempt commit is a single atomic store operation.
    pub async fn verify(&self, contact: &str, code: &str) -> DomainResult<VerifiedOutcome> {
        let contact = Identifier::normalize_contact(contact)?;

        let request = self
            .store
            .load_active(&contact)
            .await?
            .ok_or(VerificationError::NotFoundActiveRequest)?;

        if request.is_expired() {
            return Err(VerificationError::ExpiredRequest.into());
        }
        if request.attempts_exhausted() {
            return Err(VerificationError::AttemptsExhausted.into());
        }

        let code_matches = request.code_hash.matches(code);

        let outcome = self
            .store
            .increment_attempt_and_maybe_consume(request.id, code_matches)
            .await?;

        match outcome {
            AttemptOutcome::Consumed => {
                tracing::info!(
                    identifier = %mask_contact(&contact),
                    event = "otp_verified",
                    "Verification code successfully verified"
                );
                self.resolve_account(&contact).await
            }
            AttemptOutcome::Rejected { attempts_remaining } => {
                tracing::warn!(
                    identifier = %mask_contact(&contact),
                    attempts_remaining,
                    event = "otp_rejected",
                    "Verification code did not match"
                );
                Err(VerificationError::InvalidCode { attempts_remaining }.into())
            }
            AttemptOutcome::Exhausted => {
                tracing::warn!(
                    identifier = %mask_contact(&contact),
                    event = "otp_attempts_exhausted",
                    "Maximum verification attempts reached"
                );
                Err(VerificationError::AttemptsExhausted.into())
            }
            AttemptOutcome::Expired => Err(VerificationError::ExpiredRequest.into()),
            AttemptOutcome::NotActive => Err(VerificationError::NotFoundActiveRequest.into()),
        }
    }

    /// Rolls back a request after a failed dispatch and reports the failure
    ///
    /// The discarded request no longer counts toward the backoff sequence:
    /// the caller never received a code, so the failed attempt must not cost
    /// them a progressively longer wait.
    async fn fail_dispatch(
        &self,
        identifier: &Identifier,
        request_id: uuid::Uuid,
        error: &str,
    ) -> DomainResult<GenerateOutcome> {
        tracing::error!(
            identifier = %identifier.masked(),
            channel = %identifier.channel(),
            error = %error,
            event = "otp_dispatch_failed",
            "Failed to dispatch verification code"
        );
        if let Err(discard_error) = self.store.discard(request_id).await {
            tracing::error!(
                identifier = %identifier.masked(),
                error = %discard_error,
                event = "otp_discard_failed",
                "Failed to discard request after dispatch failure"
            );
        }
        Err(VerificationError::DispatchFailure.into())
    }

    /// Exchanges a verified contact for an account session, when one exists
    async fn resolve_account(&self, contact: &str) -> DomainResult<VerifiedOutcome> {
        let Some(user) = self.users.find_by_contact(contact).await? else {
            tracing::info!(
                identifier = %mask_contact(contact),
                event = "otp_verified_no_account",
                "Identifier verified without a registered account"
            );
            return Ok(VerifiedOutcome::NoAccount);
        };

        let tokens = self.tokens.issue(&user).await?;
        Ok(VerifiedOutcome::SignedIn { user, tokens })
    }
}
