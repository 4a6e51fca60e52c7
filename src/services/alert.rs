use std::sync::Arc;

use chrono::Utc;
use lettre::message::Mailbox;
use tracing::{debug, info};

use crate::clients::{MailTransport, OutgoingMail};
use crate::config::MailConfig;
use crate::error::Result;
use crate::models::FlaggedSet;

/// One `"<name> : <grade>"` line per flagged entity, newline separated.
pub fn render_body(flagged: &FlaggedSet) -> String {
    flagged
        .iter()
        .map(|entity| format!("{} : {}", entity.name, entity.grade))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct AlertSender {
    transport: Arc<dyn MailTransport>,
    from: Mailbox,
    to: Mailbox,
    subject: String,
}

impl AlertSender {
    pub fn new(config: &MailConfig, transport: Arc<dyn MailTransport>) -> Result<Self> {
        Ok(Self {
            transport,
            from: config.sender.parse()?,
            to: config.recipient.parse()?,
            subject: config.subject.clone(),
        })
    }

    /// Returns `Ok(false)` without touching the relay when nothing was flagged.
    pub async fn send(&self, flagged: &FlaggedSet) -> Result<bool> {
        if flagged.is_empty() {
            debug!("Nothing flagged, no alert sent");
            return Ok(false);
        }

        let mail = OutgoingMail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: format!(
                "{} ({})",
                self.subject,
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ),
            body: render_body(flagged),
        };

        self.transport.deliver(mail).await?;

        info!(
            flagged = flagged.len(),
            recipient = %self.to,
            "Alert sent"
        );

        Ok(true)
    }
}
