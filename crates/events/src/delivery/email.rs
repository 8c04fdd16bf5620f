//! Email notification delivery via SMTP.
//!
//! [`EmailNotifier`] wraps the `lettre` async SMTP transport to send HTML
//! notification emails to a fixed recipient. Configuration is loaded from
//! environment variables; if `SMTP_HOST` is not set, [`EmailConfig::from_env`]
//! returns `None` and no mailer should be constructed.

use async_trait::async_trait;
use filmdb_core::error::CoreError;
use filmdb_core::store::Notifier;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_ADDRESS: &str = "noreply@filmdb.local";

const DEFAULT_TO_ADDRESS: &str = "redaktion@filmdb.local";

/// Configuration for the SMTP notifier.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Recipient of every notification.
    pub to_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable         | Required | Default                   |
    /// |------------------|----------|---------------------------|
    /// | `SMTP_HOST`      | yes      |                           |
    /// | `SMTP_PORT`      | no       | `587`                     |
    /// | `SMTP_FROM`      | no       | `noreply@filmdb.local`    |
    /// | `SMTP_TO`        | no       | `redaktion@filmdb.local`  |
    /// | `SMTP_USER`      | no       |                           |
    /// | `SMTP_PASSWORD`  | no       |                           |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            to_address: std::env::var("SMTP_TO").unwrap_or_else(|_| DEFAULT_TO_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailNotifier
// ---------------------------------------------------------------------------

/// Sends notifications as HTML mail via SMTP.
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Assemble the message without sending it.
    pub fn build_message(&self, subject: &str, body: &str) -> Result<Message, EmailError> {
        Message::builder()
            .from(self.config.from_address.parse()?)
            .to(self.config.to_address.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    /// Send one notification to the configured recipient.
    pub async fn deliver(&self, subject: &str, body: &str) -> Result<(), EmailError> {
        let email = self.build_message(subject, body)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = %self.config.to_address, subject, "Notification email sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), CoreError> {
        self.deliver(subject, body)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config(to: &str) -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            to_address: to.to_string(),
            smtp_user: None,
            smtp_password: None,
        }
    }

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn message_carries_subject_and_html_body() {
        let notifier = EmailNotifier::new(config("redaktion@filmdb.local"));

        let message = notifier
            .build_message(
                "Neuer Film 7",
                "Der Film mit dem Titel <strong>Inception</strong> ist angelegt.",
            )
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Neuer Film 7"));
        assert!(raw.contains("To: redaktion@filmdb.local"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("<strong>Inception</strong>"));
    }

    #[test]
    fn bad_recipient_is_an_address_error() {
        let notifier = EmailNotifier::new(config("not-an-email"));
        assert_matches!(
            notifier.build_message("s", "b"),
            Err(EmailError::Address(_))
        );
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
