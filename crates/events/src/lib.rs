//! Outbound notifications for the film service.
//!
//! - [`EmailNotifier`]: sends mail through an SMTP relay.
//! - [`LogNotifier`]: writes the notification to the log instead.
//!
//! Use [`notifier_from_env`] to pick one based on the environment.

use std::sync::Arc;

use filmdb_core::store::Notifier;

pub mod delivery;

pub use delivery::email::{EmailConfig, EmailError, EmailNotifier};
pub use delivery::log::LogNotifier;

/// An [`EmailNotifier`] if `SMTP_HOST` is set, otherwise a [`LogNotifier`].
pub fn notifier_from_env() -> Arc<dyn Notifier> {
    match EmailConfig::from_env() {
        Some(config) => {
            tracing::info!(host = %config.smtp_host, to = %config.to_address, "Email notifications enabled");
            Arc::new(EmailNotifier::new(config))
        }
        None => {
            tracing::info!("SMTP_HOST not set, notifications go to the log");
            Arc::new(LogNotifier)
        }
    }
}
