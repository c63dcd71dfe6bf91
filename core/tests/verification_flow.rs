//! End-to-end verification flow tests wiring the engine to the in-memory
//! store, the in-memory user lookup, and the JWT issuer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vg_core::domain::value_objects::Identifier;
use vg_core::{
    Channel, DispatchGateway, DomainError, InMemoryRequestStore, InMemoryUserLookup,
    JwtTokenIssuer, User, VerificationEngine, VerificationError, VerifiedOutcome,
};
use vg_shared::config::{OtpConfig, TokenConfig};

/// Gateway that records dispatched codes instead of sending them
struct RecordingGateway {
    sent: Mutex<HashMap<String, String>>,
}

impl RecordingGateway {
    fn new() -> Self {
        Self {
            sent: Mutex::new(HashMap::new()),
        }
    }

    fn code_for(&self, contact: &str) -> Option<String> {
        self.sent.lock().unwrap().get(contact).cloned()
    }
}

#[async_trait]
impl DispatchGateway for RecordingGateway {
    async fn send(&self, identifier: &Identifier, code: &str) -> Result<String, String> {
        self.sent
            .lock()
            .unwrap()
            .insert(identifier.contact().to_string(), code.to_string());
        Ok(format!("recorded-{}", identifier.channel()))
    }
}

type FlowEngine =
    VerificationEngine<InMemoryRequestStore, RecordingGateway, InMemoryUserLookup, JwtTokenIssuer>;

struct Flow {
    engine: FlowEngine,
    gateway: Arc<RecordingGateway>,
    users: Arc<InMemoryUserLookup>,
}

fn flow(config: OtpConfig) -> Flow {
    let gateway = Arc::new(RecordingGateway::new());
    let users = Arc::new(InMemoryUserLookup::new());
    let issuer = Arc::new(JwtTokenIssuer::new(TokenConfig::new(
        "flow-test-secret-with-enough-entropy".to_string(),
    )));
    let engine = VerificationEngine::new(
        Arc::new(InMemoryRequestStore::new()),
        Arc::clone(&gateway),
        Arc::clone(&users),
        issuer,
        config,
    );
    Flow {
        engine,
        gateway,
        users,
    }
}

fn expect_verification(err: DomainError) -> VerificationError {
    match err {
        DomainError::Verification(e) => e,
        other => panic!("expected verification error, got {:?}", other),
    }
}

#[tokio::test]
async fn registered_user_signs_in_with_jwt_pair() {
    let f = flow(OtpConfig::default());
    let phone = "+14155550123";
    f.users
        .insert(User::new(None, Some(phone.to_string())))
        .await;

    f.engine.generate(phone, Channel::Sms).await.unwrap();
    let code = f.gateway.code_for(phone).unwrap();

    match f.engine.verify(phone, &code).await.unwrap() {
        VerifiedOutcome::SignedIn { user, tokens } => {
            assert_eq!(user.phone_number.as_deref(), Some(phone));
            assert!(!tokens.access.is_empty());
            assert!(!tokens.refresh.is_empty());
            assert_ne!(tokens.access, tokens.refresh);
        }
        VerifiedOutcome::NoAccount => panic!("expected SignedIn outcome"),
    }
}

#[tokio::test]
async fn unregistered_contact_verifies_without_account() {
    let f = flow(OtpConfig::default());
    let email = "newcomer@example.com";

    f.engine.generate(email, Channel::Email).await.unwrap();
    let code = f.gateway.code_for(email).unwrap();

    let outcome = f.engine.verify(email, &code).await.unwrap();
    assert_eq!(outcome, VerifiedOutcome::NoAccount);
}

#[tokio::test]
async fn distinct_contacts_are_throttled_independently() {
    let f = flow(OtpConfig::default());
    let first = "+14155550123";
    let second = "+14155550124";

    f.engine.generate(first, Channel::Sms).await.unwrap();
    // The other contact's first request is not affected by the first's.
    let outcome = f.engine.generate(second, Channel::Sms).await.unwrap();
    assert!(outcome.next_allowed_at.is_none());

    let err = expect_verification(f.engine.generate(first, Channel::Sms).await.unwrap_err());
    assert!(matches!(err, VerificationError::Throttled { .. }));
}

#[tokio::test]
async fn superseded_code_cannot_sign_in() {
    let f = flow(OtpConfig {
        waiting_periods: vec![0],
        ..OtpConfig::default()
    });
    let phone = "+14155550123";
    f.users
        .insert(User::new(None, Some(phone.to_string())))
        .await;

    f.engine.generate(phone, Channel::Sms).await.unwrap();
    let old_code = f.gateway.code_for(phone).unwrap();
    f.engine.generate(phone, Channel::Sms).await.unwrap();
    let new_code = f.gateway.code_for(phone).unwrap();

    if old_code != new_code {
        let err = expect_verification(f.engine.verify(phone, &old_code).await.unwrap_err());
        assert!(matches!(err, VerificationError::InvalidCode { .. }));
    }

    match f.engine.verify(phone, &new_code).await.unwrap() {
        VerifiedOutcome::SignedIn { .. } => {}
        VerifiedOutcome::NoAccount => panic!("expected SignedIn outcome"),
    }
}

#[tokio::test]
async fn exhausted_request_blocks_even_the_issued_code() {
    let f = flow(OtpConfig::default());
    let phone = "+14155550123";

    f.engine.generate(phone, Channel::Sms).await.unwrap();
    let code = f.gateway.code_for(phone).unwrap();
    let wrong = if code == "000000" { "999999" } else { "000000" };

    for _ in 0..2 {
        let err = expect_verification(f.engine.verify(phone, wrong).await.unwrap_err());
        assert!(matches!(err, VerificationError::InvalidCode { .. }));
    }

    let err = expect_verification(f.engine.verify(phone, &code).await.unwrap_err());
    assert_eq!(err, VerificationError::AttemptsExhausted);
}
