use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use http::header::{AUTHORIZATION, HeaderValue};
use reqwest::Client;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Upper bound on how much of an error body is kept for logs.
const MAX_ERROR_BODY: usize = 512;

/// Source of raw factor-summary bytes for one cycle.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
}

pub struct ScorecardClient {
    client: Client,
    endpoint: String,
    authorization: HeaderValue,
}

impl ScorecardClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Token {}", config.token))
            .map_err(|_| Error::InvalidConfig("api.token is not a valid header value".to_string()))?;
        authorization.set_sensitive(true);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        debug!(
            endpoint = %config.endpoint,
            timeout_secs = config.timeout_secs,
            "Creating scorecard client"
        );

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            authorization,
        })
    }
}

#[async_trait]
impl Fetch for ScorecardClient {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, self.authorization.clone())
            .send()
            .await?;

        let status = response.status();
        debug!(
            status = status.as_u16(),
            url = %self.endpoint,
            "API response received"
        );

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let body = truncate(body, MAX_ERROR_BODY);
            debug!(
                status = status.as_u16(),
                body = %body,
                "Unexpected status from scorecard API"
            );
            return Err(Error::UnexpectedStatus { status, body });
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Read factor summary body");

        Ok(body.to_vec())
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
