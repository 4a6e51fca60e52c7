pub mod http;
pub mod mail;

pub use self::http::{Fetch, ScorecardClient};
pub use self::mail::{MailTransport, OutgoingMail, SmtpRelay};
