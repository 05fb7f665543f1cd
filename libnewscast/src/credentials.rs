//! Credential loading from the environment
//!
//! Credentials live in environment variables (a `.env` file in development,
//! loaded by the binaries before anything else). The library never prompts
//! and never writes credentials anywhere.

use crate::error::{PlatformError, Result};

/// Twitter API credentials
///
/// The posting endpoint is authenticated with an OAuth 2.0 user-context
/// access token. App-only bearer tokens cannot create tweets.
#[derive(Debug, Clone)]
pub struct TwitterCredentials {
    pub access_token: String,
}

impl TwitterCredentials {
    /// Read credentials from `TWITTER_ACCESS_TOKEN`
    pub fn from_env() -> Result<Self> {
        let access_token = require_env("TWITTER_ACCESS_TOKEN")?;
        Ok(Self { access_token })
    }
}

/// Read the NewsAPI key from `NEWS_API_KEY`
pub fn news_api_key_from_env() -> Result<String> {
    require_env("NEWS_API_KEY")
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(PlatformError::Authentication(format!(
            "{} is not set. Add it to your environment or a .env file in the working directory.",
            name
        ))
        .into()),
    }
}
