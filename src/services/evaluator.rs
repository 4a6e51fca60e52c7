use tracing::{debug, info};

use crate::error::Result;
use crate::models::{FlaggedSet, RatingResponse};

/// Flags every entity whose score is strictly below the threshold.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    threshold: i64,
}

impl Evaluator {
    pub fn new(threshold: i64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn evaluate(&self, body: &[u8]) -> Result<FlaggedSet> {
        let response: RatingResponse = serde_json::from_slice(body)?;

        if response.is_empty() {
            info!("Empty response");
        }

        Ok(self.flag(response))
    }

    pub fn flag(&self, response: RatingResponse) -> FlaggedSet {
        let total = response.len();
        let flagged: Vec<_> = response
            .entries
            .into_iter()
            .filter(|entity| entity.score < self.threshold)
            .collect();

        debug!(
            entities = total,
            flagged = flagged.len(),
            threshold = self.threshold,
            "Evaluated factor summary"
        );

        FlaggedSet::new(flagged)
    }
}
