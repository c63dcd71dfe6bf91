//! Traits for delivery gateway integration

use async_trait::async_trait;

use crate::domain::value_objects::Identifier;

/// Trait for code delivery gateway integration
///
/// Implementations own provider selection, bounded retries, and timeouts;
/// the engine only sees success or failure. The plaintext code crosses this
/// boundary and nowhere else.
#[async_trait]
pub trait DispatchGateway: Send + Sync {
    /// Deliver a verification code to the identifier over its channel
    ///
    /// Returns a provider message id on success, an error message on
    /// failure.
    async fn send(&self, identifier: &Identifier, code: &str) -> Result<String, String>;
}
