use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::sync::{Arc, Mutex};

use crate::config::SmtpConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// Outbound mail collaborator. A failed send is reported to the caller, never
/// swallowed.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, subject: &str, body: &str, from: &str, to: &[String]) -> Result<(), MailError>;
}

// =============================================================================
// SMTP
// =============================================================================

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if let Some(port) = config.port {
            builder = builder.port(port);
        }

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, subject: &str, body: &str, from: &str, to: &[String]) -> Result<(), MailError> {
        let mut builder = Message::builder().from(parse_mailbox(from)?).subject(subject);
        for recipient in to {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let message = builder
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::info!(recipients = to.len(), subject, "Mail sent via SMTP");
        Ok(())
    }
}

// =============================================================================
// LOG (development)
// =============================================================================

/// Writes mail to the tracing output instead of delivering it. Only meant for
/// local runs without an SMTP relay.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, subject: &str, body: &str, from: &str, to: &[String]) -> Result<(), MailError> {
        tracing::info!(from, to = ?to, subject, "Mail (log backend)\n{}", body);
        Ok(())
    }
}

// =============================================================================
// MEMORY (tests)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Keeps every message in an outbox. Can be switched into a failing mode to
/// exercise delivery errors.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<SentMail>>>,
    fail: bool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            outbox: Arc::default(),
            fail: true,
        }
    }

    pub fn outbox(&self) -> Vec<SentMail> {
        self.outbox
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<SentMail> {
        self.outbox().pop()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, subject: &str, body: &str, from: &str, to: &[String]) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("connection refused".to_string()));
        }

        self.outbox
            .lock()
            .map_err(|e| MailError::Transport(e.to_string()))?
            .push(SentMail {
                subject: subject.to_string(),
                body: body.to_string(),
                from: from.to_string(),
                to: to.to_vec(),
            });
        Ok(())
    }
}
