mod response;
mod scorecard;

pub use response::RatingResponse;
pub use scorecard::{FlaggedSet, IssueRecord, RatingEntity};
