//! User lookup trait for resolving accounts after verification.
//!
//! Account storage is an external collaborator; the engine only needs a
//! narrow read-side interface to exchange a verified contact for a user.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Read-side lookup of users by contact identifier
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Find a user reachable at the given normalized contact
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No account registered for this contact; not an error
    /// * `Err(DomainError)` - Lookup backend failure
    async fn find_by_contact(&self, contact: &str) -> Result<Option<User>, DomainError>;
}
