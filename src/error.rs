use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Mail delivery error: {0}")]
    Delivery(#[from] lettre::transport::smtp::Error),

    #[error("Mail message error: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Short taxonomy label used as the `error.kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport(_) => "transport",
            Error::UnexpectedStatus { .. } => "unexpected_status",
            Error::Parse(_) => "parse",
            Error::Delivery(_) | Error::Message(_) => "delivery",
            Error::Address(_) => "address",
            Error::Config(_) | Error::InvalidConfig(_) => "config",
        }
    }

    /// Failures on the fetch side of a cycle (network or a non-200 answer).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::UnexpectedStatus { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_follow_taxonomy() {
        let status = Error::UnexpectedStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        };
        assert_eq!(status.kind(), "unexpected_status");
        assert!(status.is_fetch_failure());

        let parse = Error::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert_eq!(parse.kind(), "parse");
        assert!(!parse.is_fetch_failure());

        assert_eq!(Error::InvalidConfig("x".into()).kind(), "config");
    }

    #[test]
    fn unexpected_status_display_names_code() {
        let err = Error::UnexpectedStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "down".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected response status 503 Service Unavailable: down"
        );
    }
}
