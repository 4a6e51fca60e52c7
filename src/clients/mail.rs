use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config::MailConfig;
use crate::error::Result;

const RELAY_TIMEOUT: Duration = Duration::from_secs(30);

/// A rendered plaintext alert ready for the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, mail: OutgoingMail) -> Result<()>;
}

/// Unauthenticated plaintext SMTP relay.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    relay: String,
}

impl SmtpRelay {
    pub fn new(config: &MailConfig) -> Self {
        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.relay_host.as_str())
                .port(config.relay_port)
                .timeout(Some(RELAY_TIMEOUT))
                .build();

        Self {
            transport,
            relay: format!("{}:{}", config.relay_host, config.relay_port),
        }
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn deliver(&self, mail: OutgoingMail) -> Result<()> {
        let message = Message::builder()
            .from(mail.from)
            .to(mail.to)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)?;

        debug!(relay = %self.relay, "Connecting to mail relay");
        let response = self.transport.send(message).await?;

        debug!(
            relay = %self.relay,
            code = %response.code(),
            "Mail relay accepted message"
        );

        Ok(())
    }
}
