//! Mock collaborators for verification engine tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;
use crate::domain::value_objects::Identifier;
use crate::errors::DomainError;
use crate::services::token::TokenIssuer;
use crate::services::verification::traits::DispatchGateway;

/// Mock dispatch gateway recording every sent code
pub struct MockDispatchGateway {
    pub sent: Arc<Mutex<HashMap<String, String>>>,
    pub should_fail: bool,
    /// Artificial send latency in milliseconds, for timeout tests
    pub delay_ms: u64,
}

impl MockDispatchGateway {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(HashMap::new())),
            should_fail: false,
            delay_ms: 0,
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new()
        }
    }

    /// The last code dispatched to a contact
    pub fn sent_code(&self, contact: &str) -> Option<String> {
        self.sent.lock().unwrap().get(contact).cloned()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl DispatchGateway for MockDispatchGateway {
    async fn send(&self, identifier: &Identifier, code: &str) -> Result<String, String> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        if self.should_fail {
            return Err("provider rejected the message".to_string());
        }
        self.sent
            .lock()
            .unwrap()
            .insert(identifier.contact().to_string(), code.to_string());
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }
}

/// Mock token issuer producing fixed-shape tokens
pub struct MockTokenIssuer {
    pub issued_for: Arc<Mutex<Vec<uuid::Uuid>>>,
}

impl MockTokenIssuer {
    pub fn new() -> Self {
        Self {
            issued_for: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl TokenIssuer for MockTokenIssuer {
    async fn issue(&self, user: &User) -> Result<TokenPair, DomainError> {
        self.issued_for.lock().unwrap().push(user.id);
        Ok(TokenPair {
            access: format!("access-{}", user.id),
            refresh: format!("refresh-{}", user.id),
            access_expires_at: chrono::Utc::now() + chrono::Duration::minutes(15),
        })
    }
}
