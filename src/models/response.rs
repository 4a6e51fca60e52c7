use serde::Deserialize;

use super::scorecard::{RatingEntity, null_as_default};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<RatingEntity>,
}

impl RatingResponse {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
