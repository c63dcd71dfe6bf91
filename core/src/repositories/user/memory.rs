//! In-memory implementation of the user lookup, for tests and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::trait_::UserLookup;

/// In-memory user lookup backed by a map of registered users
pub struct InMemoryUserLookup {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserLookup {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a user so later lookups can find it
    pub async fn insert(&self, user: User) {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
    }
}

impl Default for InMemoryUserLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserLookup for InMemoryUserLookup {
    async fn find_by_contact(&self, contact: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.has_contact(contact)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_user_by_email_or_phone() {
        let lookup = InMemoryUserLookup::new();
        let user = User::new(
            Some("user@example.com".to_string()),
            Some("+61412345678".to_string()),
        );
        lookup.insert(user.clone()).await;

        let by_email = lookup.find_by_contact("user@example.com").await.unwrap();
        assert_eq!(by_email.as_ref().map(|u| u.id), Some(user.id));

        let by_phone = lookup.find_by_contact("+61412345678").await.unwrap();
        assert_eq!(by_phone.map(|u| u.id), Some(user.id));

        assert!(lookup
            .find_by_contact("other@example.com")
            .await
            .unwrap()
            .is_none());
    }
}
