//! newscast-probe - Rate-limit diagnostic for the posting API
//!
//! Sends a deliberately empty tweet, which the API rejects without spending
//! quota, and prints the rate-limit headers from the rejection. Useful when
//! the bot keeps reporting throttled cycles and you want to see the actual
//! window state.

use chrono::Utc;
use clap::Parser;
use libnewscast::credentials::TwitterCredentials;
use libnewscast::error::{PlatformError, Result};
use libnewscast::logging::{LogFormat, LoggingConfig};
use libnewscast::platforms::twitter::TWEETS_URL;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "newscast-probe")]
#[command(version)]
#[command(about = "Print the posting API's current rate-limit headers")]
struct Cli {
    /// Endpoint to probe (defaults to the tweet-creation endpoint)
    #[arg(long, value_name = "URL", default_value = TWEETS_URL)]
    url: String,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    LoggingConfig::new(LogFormat::Text, "warn".to_string(), false).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli.url).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(url: &str) -> Result<()> {
    let credentials = TwitterCredentials::from_env()?;
    let client = reqwest::Client::new();

    println!("Probing {} with an empty tweet...", url);

    // An empty tweet is always rejected, so the request costs nothing but
    // still comes back with the live rate-limit headers.
    let response = client
        .post(url)
        .bearer_auth(&credentials.access_token)
        .json(&serde_json::json!({ "text": "" }))
        .send()
        .await
        .map_err(|e| PlatformError::Network(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    println!("Status: {}", status);
    debug!(%status, "probe response received");

    println!("\nRate limit headers:");
    let mut saw_any = false;
    for (name, value) in response.headers() {
        let lower = name.as_str().to_ascii_lowercase();
        if lower.contains("rate-limit") || lower == "retry-after" {
            println!("  {}: {}", name, value.to_str().unwrap_or("<binary>"));
            saw_any = true;
        }
    }
    if !saw_any {
        println!("  (none present)");
    }

    if let Some(reset) = response
        .headers()
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
    {
        let wait = reset.saturating_sub(Utc::now().timestamp()).max(0);
        println!("\nWindow resets in {} seconds.", wait);
    }

    Ok(())
}
