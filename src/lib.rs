pub mod clients;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod shutdown;

pub use clients::{Fetch, MailTransport, OutgoingMail, ScorecardClient, SmtpRelay};
pub use config::Settings;
pub use error::{Error, Result};
pub use models::{FlaggedSet, IssueRecord, RatingEntity, RatingResponse};
pub use scheduler::{Scheduler, SchedulerState};
pub use services::{AlertSender, CycleOutcome, Evaluator, Monitor, render_body};
pub use shutdown::Shutdown;
