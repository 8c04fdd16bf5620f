//! Fallback notifier used when no mail server is configured.

use async_trait::async_trait;
use filmdb_core::error::CoreError;
use filmdb_core::store::Notifier;

/// Writes each notification to the log at `info` level. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), CoreError> {
        tracing::info!(subject, body, "Notification (mail disabled)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        assert!(LogNotifier.notify("Neuer Film 1", "body").await.is_ok());
    }
}
