use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;
use thiserror::Error;

use crate::config::Config;
use crate::domain::user::notifications::AccountRegistered;
use crate::domain::user::notifications::LoginDetected;
use crate::domain::user::notifications::PasswordResetRequested;
use crate::domain::user::notifications::VerificationRequested;
use crate::outbound::notifier::templates;
use crate::user::errors::NotifierError;
use crate::user::ports::Notifier;

#[derive(Debug, Error)]
pub enum SmtpNotifierError {
    #[error("Failed to build email message: {0}")]
    InvalidMessage(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

impl From<SmtpNotifierError> for NotifierError {
    fn from(err: SmtpNotifierError) -> Self {
        match err {
            SmtpNotifierError::InvalidMessage(msg) => NotifierError::BuildFailed(msg),
            SmtpNotifierError::SendFailed(msg) => NotifierError::SendFailed(msg),
        }
    }
}

/// Notifier port implementation over an async SMTP relay.
///
/// The transport is constructed once at startup; per-send failures are the
/// caller's to log, delivery is best-effort by contract.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    base_url: String,
}

impl SmtpNotifier {
    /// Create a new SMTP notifier from configuration.
    ///
    /// # Errors
    /// Fails at startup if the relay host or the configured sender mailbox
    /// is invalid.
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(
            host = %config.smtp.host,
            sender = %config.smtp.sender,
            "Initializing SMTP transport for notification emails"
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp.host)?
            .credentials(Credentials::new(
                config.smtp.username.clone(),
                config.smtp.password.clone(),
            ))
            .build();

        let sender: Mailbox = config.smtp.sender.parse()?;

        Ok(Self {
            transport,
            sender,
            base_url: config.app.base_url.clone(),
        })
    }

    async fn send(&self, to: &str, subject: &str, html: String) -> Result<(), SmtpNotifierError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                SmtpNotifierError::InvalidMessage(e.to_string())
            })?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| SmtpNotifierError::InvalidMessage(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| {
                tracing::debug!(to = %to, subject = %subject, "Notification email sent");
            })
            .map_err(|e| SmtpNotifierError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_verification(&self, notice: &VerificationRequested) -> Result<(), NotifierError> {
        let (subject, html) = templates::verification(&self.base_url, notice);
        self.send(&notice.email, &subject, html).await.map_err(Into::into)
    }

    async fn send_welcome(&self, notice: &AccountRegistered) -> Result<(), NotifierError> {
        let (subject, html) = templates::welcome(notice);
        self.send(&notice.email, &subject, html).await.map_err(Into::into)
    }

    async fn send_login_alert(&self, notice: &LoginDetected) -> Result<(), NotifierError> {
        let (subject, html) = templates::login_alert(notice);
        self.send(&notice.email, &subject, html).await.map_err(Into::into)
    }

    async fn send_password_reset(
        &self,
        notice: &PasswordResetRequested,
    ) -> Result<(), NotifierError> {
        let (subject, html) = templates::password_reset(&self.base_url, notice);
        self.send(&notice.email, &subject, html).await.map_err(Into::into)
    }
}
