use std::time::Duration;

use chrono::{DateTime, Utc};
use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};

use crate::config::Config;
use crate::domain::{Digest, Encryption, MatchRecord, TransportProfile, TransportTable};
use crate::errors::{FeederError, FeederResult};

/// A composed message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub secret: String,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("secret", &"*".repeat(self.secret.len()))
            .finish()
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait MailTransport {
    fn deliver(
        &self,
        profile: &TransportProfile,
        credentials: &SmtpCredentials,
        mail: &OutgoingMail,
    ) -> FeederResult<()>;
}

/// Blocking SMTP delivery through lettre.
pub struct SmtpMailTransport {
    timeout: Duration,
}

impl SmtpMailTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn build_message(mail: &OutgoingMail) -> FeederResult<Message> {
        let from: Mailbox = mail.from.parse()?;
        let to: Mailbox = mail.to.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())?;

        Ok(message)
    }
}

impl MailTransport for SmtpMailTransport {
    fn deliver(
        &self,
        profile: &TransportProfile,
        credentials: &SmtpCredentials,
        mail: &OutgoingMail,
    ) -> FeederResult<()> {
        let message = Self::build_message(mail)?;

        let builder = match profile.encryption {
            Encryption::ImplicitTls => SmtpTransport::relay(&profile.host)?,
            Encryption::StartTls => SmtpTransport::starttls_relay(&profile.host)?,
        };

        let mailer = builder
            .port(profile.port)
            .credentials(Credentials::new(
                credentials.username.clone(),
                credentials.secret.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        mailer.send(&message)?;
        Ok(())
    }
}

pub struct NotificationService<T: MailTransport> {
    transport: T,
    table: TransportTable,
    sender: Option<String>,
    recipient: Option<String>,
    secret: Option<String>,
}

impl<T: MailTransport> NotificationService<T> {
    pub fn new(config: &Config, transport: T) -> Self {
        Self {
            transport,
            table: TransportTable::default(),
            sender: config.email_from.clone(),
            recipient: config.recipient().map(|r| r.to_string()),
            secret: config.app_password.clone(),
        }
    }

    pub fn with_table(mut self, table: TransportTable) -> Self {
        self.table = table;
        self
    }

    /// Profile the digest would be sent through.
    pub fn profile(&self) -> &TransportProfile {
        match &self.sender {
            Some(sender) => self.table.for_sender(sender),
            None => self.table.default_profile(),
        }
    }

    /// Send one digest of all matches. Does nothing for an empty list.
    pub fn notify(&self, matches: &[MatchRecord]) -> FeederResult<()> {
        self.notify_at(matches, Utc::now())
    }

    pub fn notify_at(&self, matches: &[MatchRecord], now: DateTime<Utc>) -> FeederResult<()> {
        if matches.is_empty() {
            return Ok(());
        }

        let sender = self
            .sender
            .as_deref()
            .ok_or_else(|| FeederError::Transport("sender address (EMAIL_FROM) is not set".to_string()))?;
        let recipient = self.recipient.as_deref().unwrap_or(sender);

        let digest = Digest::new(matches, now);
        let mail = OutgoingMail {
            from: sender.to_string(),
            to: recipient.to_string(),
            subject: digest.subject(),
            body: digest.body(),
        };

        // A missing secret still goes to the server and fails at login.
        let credentials = SmtpCredentials {
            username: sender.to_string(),
            secret: self.secret.clone().unwrap_or_default(),
        };

        let profile = self.profile();
        tracing::info!(
            host = %profile.host,
            port = profile.port,
            encryption = %profile.encryption,
            matches = matches.len(),
            "Sending digest"
        );

        self.transport
            .deliver(profile, &credentials, &mail)
            .map_err(|e| match e {
                FeederError::Transport(_) => e,
                other => FeederError::Transport(other.to_string()),
            })?;

        tracing::info!(to = %recipient, "Digest sent");
        Ok(())
    }
}
