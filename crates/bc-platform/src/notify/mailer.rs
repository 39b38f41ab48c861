//! Mailer trait and SMTP implementation.
//!
//! The delivery provider is an opaque network collaborator; the
//! `Mailer` trait is the seam that lets the dispatcher be exercised
//! against fakes in tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bc_config::SmtpConfig;
use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

/// Errors raised while building or submitting an email.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// One fully-assembled reminder, addressed to a single recipient.
#[derive(Debug, Clone)]
pub struct ReminderEmail {
    pub from: String,
    pub to: String,
    /// Always empty for SMS-gateway recipients; gateways render the
    /// subject inline with the body otherwise.
    pub subject: String,
    pub body: String,
    /// Message-identifier header value, derived from the recipient.
    pub message_id: String,
    pub reply_to: String,
    /// Routing tag identifying this application to the provider.
    pub tag: String,
}

/// Async email sending seam.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: &ReminderEmail) -> Result<(), MailError>;
}

/// Provider routing tag, carried as an `X-PM-Tag` header.
#[derive(Debug, Clone, PartialEq)]
struct RoutingTag(String);

impl Header for RoutingTag {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-PM-Tag")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// SMTP-based mailer using lettre.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    /// Build a mailer from explicit configuration. Credentials come
    /// from config or environment, never from source.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = match config.tls.as_str() {
            "none" => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            _ => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
        };

        builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: Arc::new(builder.build()),
        })
    }

    fn build_message(email: &ReminderEmail) -> Result<Message, MailError> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|_| MailError::InvalidAddress(email.from.clone()))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| MailError::InvalidAddress(email.to.clone()))?;
        let reply_to: Mailbox = email
            .reply_to
            .parse()
            .map_err(|_| MailError::InvalidAddress(email.reply_to.clone()))?;

        Message::builder()
            .from(from)
            .to(to)
            .reply_to(reply_to)
            .subject(email.subject.clone())
            .message_id(Some(email.message_id.clone()))
            .header(ContentType::TEXT_PLAIN)
            .header(RoutingTag(email.tag.clone()))
            .body(email.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &ReminderEmail) -> Result<(), MailError> {
        let message = Self::build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        Ok(())
    }
}
