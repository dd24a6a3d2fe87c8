//! Email delivery over SMTP
//!
//! [`EmailSender`] builds the message and hands it to a [`MailTransport`].
//! Production uses [`SmtpMailer`] (STARTTLS + login); tests swap in a
//! recording transport.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use super::template::{email_subject, format_email_html};
use crate::analysis::Analysis;
use crate::config::AppConfig;

/// Email errors
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Email credentials not configured (EMAIL_USER / EMAIL_PASSWORD)")]
    MissingCredentials,
    #[error("No recipients configured (EMAIL_RECIPIENTS)")]
    NoRecipients,
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Delivers one fully built message per call
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: Message) -> Result<(), EmailError>;
}

/// STARTTLS SMTP relay with login authentication.
///
/// A fresh connection is opened for every message.
#[derive(Clone)]
pub struct SmtpMailer {
    server: String,
    port: u16,
    user: Option<String>,
    password: Option<String>,
}

impl SmtpMailer {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            server: config.smtp_server.clone(),
            port: config.smtp_port,
            user: config.email_user.clone(),
            password: config.email_password.clone(),
        }
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, message: Message) -> Result<(), EmailError> {
        let (Some(user), Some(password)) = (&self.user, &self.password) else {
            return Err(EmailError::MissingCredentials);
        };

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.server)?
            .port(self.port)
            .credentials(Credentials::new(user.clone(), password.clone()))
            .build();

        mailer.send(message).await?;
        Ok(())
    }
}

/// Formats the analysis and sends it to the configured recipients
pub struct EmailSender<T> {
    transport: T,
    from: Option<String>,
    has_password: bool,
    recipients: Vec<String>,
}

impl<T: MailTransport> EmailSender<T> {
    pub fn new(transport: T, config: &AppConfig) -> Self {
        Self {
            transport,
            from: config.email_user.clone(),
            has_password: config.email_password.is_some(),
            recipients: config.recipients.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the message for `analysis` without sending it.
    pub fn build_message(&self, analysis: &Analysis) -> Result<Message, EmailError> {
        let from = match (&self.from, self.has_password) {
            (Some(from), true) => from,
            _ => return Err(EmailError::MissingCredentials),
        };
        if self.recipients.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(from.parse::<Mailbox>()?)
            .subject(email_subject(analysis.generated_at.date_naive()));
        for recipient in &self.recipients {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }

        let html = format_email_html(&analysis.text, analysis.generated_at);
        let message = builder.multipart(MultiPart::alternative().singlepart(SinglePart::html(html)))?;
        Ok(message)
    }

    /// Send the analysis. Returns the number of recipients.
    ///
    /// Missing credentials are reported before any connection is attempted.
    /// Failures are logged here and returned; nothing is retried.
    pub async fn send_analysis(&self, analysis: &Analysis) -> Result<usize, EmailError> {
        let result = match self.build_message(analysis) {
            Ok(message) => self.transport.deliver(message).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!(
                    recipients = self.recipients.len(),
                    "✅ Analysis email sent successfully to {} recipients",
                    self.recipients.len()
                );
                Ok(self.recipients.len())
            }
            Err(e) => {
                error!(error = %e, "❌ Error sending email");
                Err(e)
            }
        }
    }
}
