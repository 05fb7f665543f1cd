//! Twitter (X) platform implementation
//!
//! Posts through the v2 `/2/tweets` endpoint with an OAuth 2.0 user-context
//! bearer token. A 429 response is mapped to `PublishOutcome::Throttled`
//! with the `x-rate-limit-reset` header as the hint; every other failure is
//! an error.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::credentials::TwitterCredentials;
use crate::error::{PlatformError, Result};
use crate::platforms::{PublishOutcome, Publisher};

/// Endpoint for creating tweets
pub const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

const CHARACTER_LIMIT: usize = 280;

/// Twitter API v2 client
pub struct TwitterPublisher {
    client: reqwest::Client,
    credentials: TwitterCredentials,
    base_url: String,
}

impl TwitterPublisher {
    pub fn new(credentials: TwitterCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            base_url: TWEETS_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests, mock servers)
    pub fn with_base_url(credentials: TwitterCredentials, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            base_url,
        }
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    async fn publish(&self, text: &str) -> Result<PublishOutcome> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.credentials.access_token)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| PlatformError::Network(format!("request to {} failed: {}", self.base_url, e)))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset_epoch = parse_reset_epoch(response.headers());
            return Ok(PublishOutcome::Throttled { reset_epoch });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Authentication(format!(
                "Twitter rejected the access token ({}): {}",
                status, body
            ))
            .into());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Posting(format!(
                "Twitter returned {}: {}",
                status, body
            ))
            .into());
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PlatformError::Posting(format!("unreadable tweet response: {}", e)))?;

        let id = parse_tweet_id(&body).ok_or_else(|| {
            PlatformError::Posting(format!("tweet response carried no id: {}", body))
        })?;

        Ok(PublishOutcome::Posted { id })
    }

    fn name(&self) -> &str {
        "twitter"
    }

    fn character_limit(&self) -> Option<usize> {
        Some(CHARACTER_LIMIT)
    }
}

/// Extract the rate-limit reset hint from response headers, 0 when absent
/// or unparseable
fn parse_reset_epoch(headers: &reqwest::header::HeaderMap) -> i64 {
    headers
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Extract the tweet id from a v2 create-tweet response body
fn parse_tweet_id(body: &serde_json::Value) -> Option<String> {
    body.get("data")?
        .get("id")?
        .as_str()
        .map(|s| s.to_string())
}
