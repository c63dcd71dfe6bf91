//! User entity representing a registered account in the VeriGate system.
//!
//! Account management itself lives elsewhere; the verification engine only
//! looks accounts up by contact identifier after a successful verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Email address, if registered with one
    pub email: Option<String>,

    /// Phone number in E.164 format, if registered with one
    pub phone_number: Option<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Whether at least one contact identifier has been verified
    pub is_verified: bool,
}

impl User {
    /// Creates a new user reachable at the given contacts
    pub fn new(email: Option<String>, phone_number: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            phone_number,
            created_at: Utc::now(),
            is_verified: false,
        }
    }

    /// Marks the user as verified
    pub fn verify(&mut self) {
        self.is_verified = true;
    }

    /// Checks whether the user is reachable at the given normalized contact
    pub fn has_contact(&self, contact: &str) -> bool {
        self.email.as_deref() == Some(contact) || self.phone_number.as_deref() == Some(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_unverified() {
        let user = User::new(Some("user@example.com".to_string()), None);
        assert!(!user.is_verified);
        assert!(user.has_contact("user@example.com"));
        assert!(!user.has_contact("+61412345678"));
    }

    #[test]
    fn verify_sets_flag() {
        let mut user = User::new(None, Some("+61412345678".to_string()));
        user.verify();
        assert!(user.is_verified);
    }
}
