//! Failover dispatch gateway
//!
//! Wraps a primary and a backup gateway and switches to the backup when the
//! primary fails, retrying the primary again after a cooldown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use vg_core::domain::value_objects::Identifier;
use vg_core::services::verification::DispatchGateway;

/// State tracking for the failover gateway
#[derive(Debug, Clone, Default)]
struct FailoverState {
    /// Whether we're currently routing through the backup gateway
    using_backup: bool,
    /// When the primary gateway last failed
    last_primary_failure: Option<Instant>,
}

/// Dispatch gateway with automatic failover capability
pub struct FailoverGateway {
    primary: Arc<dyn DispatchGateway>,
    backup: Arc<dyn DispatchGateway>,
    state: RwLock<FailoverState>,
    /// How long to route through the backup before retrying the primary
    cooldown: Duration,
}

impl FailoverGateway {
    /// Create a new failover gateway
    ///
    /// # Arguments
    ///
    /// * `primary` - The gateway to prefer
    /// * `backup` - The gateway to fail over to
    /// * `cooldown` - How long to wait before retrying the primary
    pub fn new(
        primary: Arc<dyn DispatchGateway>,
        backup: Arc<dyn DispatchGateway>,
        cooldown: Duration,
    ) -> Self {
        Self {
            primary,
            backup,
            state: RwLock::new(FailoverState::default()),
            cooldown,
        }
    }

    async fn primary_preferred(&self) -> bool {
        let state = self.state.read().await;
        if !state.using_backup {
            return true;
        }
        match state.last_primary_failure {
            Some(failed_at) => failed_at.elapsed() >= self.cooldown,
            None => true,
        }
    }

    async fn record_primary_failure(&self) {
        let mut state = self.state.write().await;
        state.using_backup = true;
        state.last_primary_failure = Some(Instant::now());
    }

    async fn record_primary_recovery(&self) {
        let mut state = self.state.write().await;
        if state.using_backup {
            info!("Primary dispatch gateway recovered");
        }
        state.using_backup = false;
        state.last_primary_failure = None;
    }
}

#[async_trait]
impl DispatchGateway for FailoverGateway {
    async fn send(&self, identifier: &Identifier, code: &str) -> Result<String, String> {
        if self.primary_preferred().await {
            match self.primary.send(identifier, code).await {
                Ok(message_id) => {
                    self.record_primary_recovery().await;
                    return Ok(message_id);
                }
                Err(error) => {
                    warn!(
                        identifier = %identifier.masked(),
                        error = %error,
                        "Primary dispatch gateway failed, switching to backup"
                    );
                    self.record_primary_failure().await;
                }
            }
        }

        self.backup.send(identifier, code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vg_core::domain::value_objects::Channel;

    struct CountingGateway {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingGateway {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl DispatchGateway for CountingGateway {
        async fn send(&self, _identifier: &Identifier, _code: &str) -> Result<String, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err("provider down".to_string())
            } else {
                Ok("ok".to_string())
            }
        }
    }

    fn identifier() -> Identifier {
        Identifier::new("+14155550123", Channel::Sms).unwrap()
    }

    #[tokio::test]
    async fn healthy_primary_is_used() {
        let primary = CountingGateway::new(false);
        let backup = CountingGateway::new(false);
        let gateway = FailoverGateway::new(
            Arc::clone(&primary) as Arc<dyn DispatchGateway>,
            Arc::clone(&backup) as Arc<dyn DispatchGateway>,
            Duration::from_secs(60),
        );

        gateway.send(&identifier(), "123456").await.unwrap();
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(backup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_primary_routes_to_backup_until_cooldown() {
        let primary = CountingGateway::new(true);
        let backup = CountingGateway::new(false);
        let gateway = FailoverGateway::new(
            Arc::clone(&primary) as Arc<dyn DispatchGateway>,
            Arc::clone(&backup) as Arc<dyn DispatchGateway>,
            Duration::from_secs(60),
        );

        gateway.send(&identifier(), "123456").await.unwrap();
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(backup.calls.load(Ordering::SeqCst), 1);

        // Within the cooldown the primary is skipped entirely.
        gateway.send(&identifier(), "123456").await.unwrap();
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(backup.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn both_failing_reports_backup_error() {
        let primary = CountingGateway::new(true);
        let backup = CountingGateway::new(true);
        let gateway = FailoverGateway::new(
            Arc::clone(&primary) as Arc<dyn DispatchGateway>,
            Arc::clone(&backup) as Arc<dyn DispatchGateway>,
            Duration::from_secs(60),
        );

        let err = gateway.send(&identifier(), "123456").await.unwrap_err();
        assert_eq!(err, "provider down");
    }
}
