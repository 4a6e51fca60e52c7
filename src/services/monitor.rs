use std::sync::Arc;

use tracing::{debug, info};

use crate::clients::Fetch;
use crate::error::Result;
use crate::services::alert::AlertSender;
use crate::services::evaluator::Evaluator;

/// What one successful cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    pub flagged: usize,
    pub alerted: bool,
}

/// Fetch, evaluate, alert. One instance is shared by every cycle.
pub struct Monitor {
    fetcher: Arc<dyn Fetch>,
    evaluator: Evaluator,
    sender: AlertSender,
}

impl Monitor {
    pub fn new(fetcher: Arc<dyn Fetch>, evaluator: Evaluator, sender: AlertSender) -> Self {
        Self {
            fetcher,
            evaluator,
            sender,
        }
    }

    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let body = self.fetcher.fetch().await?;
        debug!(bytes = body.len(), "Fetched factor summary");

        let flagged = self.evaluator.evaluate(&body)?;
        if !flagged.is_empty() {
            info!(
                flagged = flagged.len(),
                threshold = self.evaluator.threshold(),
                entities = ?flagged.names(),
                "Entities below threshold"
            );
        }

        let alerted = self.sender.send(&flagged).await?;

        Ok(CycleOutcome {
            flagged: flagged.len(),
            alerted,
        })
    }
}
