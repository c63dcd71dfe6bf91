//! Console dispatch gateway for development
//!
//! Logs the verification code instead of sending it. Accepts every channel,
//! so a local setup needs no provider credentials.

use async_trait::async_trait;
use uuid::Uuid;

use vg_core::domain::value_objects::Identifier;
use vg_core::services::verification::DispatchGateway;

use super::code_message;

/// Development gateway that prints codes to the log
pub struct ConsoleGateway {
    /// Expiry stated in the message text, from the engine's configuration
    code_expiry_minutes: i64,
}

impl ConsoleGateway {
    pub fn new(code_expiry_minutes: i64) -> Self {
        Self {
            code_expiry_minutes,
        }
    }
}

#[async_trait]
impl DispatchGateway for ConsoleGateway {
    async fn send(&self, identifier: &Identifier, code: &str) -> Result<String, String> {
        let message_id = format!("console-{}", Uuid::new_v4());
        // Development only: the plaintext code is intentionally visible here.
        tracing::info!(
            identifier = %identifier.contact(),
            channel = %identifier.channel(),
            message_id = %message_id,
            "[CONSOLE DISPATCH] {}",
            code_message(code, self.code_expiry_minutes)
        );
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_core::domain::value_objects::Channel;

    #[tokio::test]
    async fn console_gateway_always_succeeds() {
        let gateway = ConsoleGateway::new(10);
        let identifier = Identifier::new("+14155550123", Channel::Sms).unwrap();
        let message_id = gateway.send(&identifier, "123456").await.unwrap();
        assert!(message_id.starts_with("console-"));
    }
}
