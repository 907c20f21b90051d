//! Alert delivery via authenticated SMTP submission.
//!
//! [`EmailNotifier`] wraps the `lettre` async SMTP transport. Port 465 uses
//! implicit TLS; every other port upgrades the connection with STARTTLS.
//! The sender address doubles as the SMTP login.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::config::EmailConfig;
use crate::domain::ports::notifier::{NotifyError, Notifier};

/// Port on which servers expect TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Upper bound on a single submission, so a stalled server cannot hold a tick.
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message, NotifyError> {
        let from = parse_mailbox(&self.config.sender)?;
        let to = parse_mailbox(&self.config.recipient)?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let host = self.config.smtp_server.as_str();
        let builder = if self.config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| NotifyError::Transport(format!("cannot configure {host}: {e}")))?;

        Ok(builder
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.sender.clone(),
                self.config.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = self.build_message(subject, body)?;
        let transport = self.build_transport()?;

        transport.send(message).await.map_err(|e| {
            NotifyError::Transport(format!(
                "{}:{} rejected the message: {e}",
                self.config.smtp_server, self.config.smtp_port
            ))
        })?;

        tracing::debug!(
            to = %self.config.recipient,
            server = %self.config.smtp_server,
            "Alert email submitted"
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|e| NotifyError::InvalidAddress(format!("{address}: {e}")))
}
