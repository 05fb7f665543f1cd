//! Content source: candidate headlines for a posting cycle
//!
//! Fetch failures are swallowed at this boundary. A cycle that cannot get
//! headlines simply has nothing to post; the next scheduled cycle retries.

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::NewsConfig;

/// A candidate headline, fresh each cycle and never persisted directly
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub source_name: String,
}

impl Article {
    pub fn new(title: &str, url: &str, source_name: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            source_name: source_name.to_string(),
        }
    }

    /// Deterministic identifier over the article's stable fields.
    ///
    /// Hashed rather than concatenated so the line-oriented dedup file
    /// stays well-formed whatever characters a title contains.
    pub fn dedup_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.url.as_bytes());
        let digest = hasher.finalize();
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// Source of candidate articles for one cycle
///
/// Implementations must not propagate fetch errors: log and return an empty
/// list instead.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self) -> Vec<Article>;
    fn name(&self) -> &str;
}

// ============================================================================
// NewsAPI
// ============================================================================

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    url: Option<String>,
    source: RawSource,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

/// NewsAPI top-headlines client
pub struct NewsApiSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    country: String,
    page_size: u32,
}

impl NewsApiSource {
    pub fn new(config: &NewsConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key,
            country: config.country.clone(),
            page_size: config.page_size,
        }
    }

    async fn fetch_inner(&self) -> Result<Vec<Article>, reqwest::Error> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("country", self.country.as_str()),
                ("pageSize", &self.page_size.to_string()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: NewsApiResponse = response.json().await?;
        Ok(parse_articles(body))
    }
}

/// Map the raw response into articles, dropping incomplete entries
fn parse_articles(response: NewsApiResponse) -> Vec<Article> {
    if response.status != "ok" {
        warn!(status = %response.status, "news feed returned non-ok status");
        return Vec::new();
    }

    response
        .articles
        .into_iter()
        .filter_map(|raw| {
            let title = raw.title?;
            let url = raw.url?;
            let source_name = raw.source.name.unwrap_or_else(|| "unknown".to_string());
            Some(Article {
                title,
                url,
                source_name,
            })
        })
        .collect()
}

#[async_trait]
impl ContentSource for NewsApiSource {
    async fn fetch(&self) -> Vec<Article> {
        match self.fetch_inner().await {
            Ok(articles) => {
                debug!(count = articles.len(), "fetched headlines");
                articles
            }
            Err(e) => {
                warn!("error fetching news: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "newsapi"
    }
}

// ============================================================================
// Static source (tests and dry runs)
// ============================================================================

/// Fixed list of articles, returned on every fetch
pub struct StaticSource {
    articles: Vec<Article>,
}

impl StaticSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    /// A source that always comes back empty
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    async fn fetch(&self) -> Vec<Article> {
        self.articles.clone()
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_id_is_deterministic() {
        let a = Article::new("Title", "https://example.com/a", "Example");
        let b = Article::new("Title", "https://example.com/a", "Example");
        assert_eq!(a.dedup_id(), b.dedup_id());
    }

    #[test]
    fn test_dedup_id_differs_by_title_and_url() {
        let a = Article::new("Title", "https://example.com/a", "Example");
        let b = Article::new("Other", "https://example.com/a", "Example");
        let c = Article::new("Title", "https://example.com/c", "Example");
        assert_ne!(a.dedup_id(), b.dedup_id());
        assert_ne!(a.dedup_id(), c.dedup_id());
    }

    #[test]
    fn test_dedup_id_ignores_source_name() {
        let a = Article::new("Title", "https://example.com/a", "Example");
        let b = Article::new("Title", "https://example.com/a", "Renamed Outlet");
        assert_eq!(a.dedup_id(), b.dedup_id());
    }

    #[test]
    fn test_dedup_id_is_single_line_hex() {
        let a = Article::new("Multi\nline\ntitle", "https://example.com", "X");
        let id = a.dedup_id();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parse_articles_ok() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"source": {"id": null, "name": "Reuters"}, "title": "Headline one", "url": "https://example.com/1"},
                {"source": {"id": "ap", "name": "AP"}, "title": "Headline two", "url": "https://example.com/2"}
            ]
        }"#;
        let response: NewsApiResponse = serde_json::from_str(json).unwrap();
        let articles = parse_articles(response);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Headline one");
        assert_eq!(articles[0].source_name, "Reuters");
        assert_eq!(articles[1].url, "https://example.com/2");
    }

    #[test]
    fn test_parse_articles_drops_incomplete_entries() {
        let json = r#"{
            "status": "ok",
            "articles": [
                {"source": {"name": "Reuters"}, "title": null, "url": "https://example.com/1"},
                {"source": {"name": "AP"}, "title": "Good", "url": null},
                {"source": {"name": null}, "title": "Kept", "url": "https://example.com/3"}
            ]
        }"#;
        let response: NewsApiResponse = serde_json::from_str(json).unwrap();
        let articles = parse_articles(response);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Kept");
        assert_eq!(articles[0].source_name, "unknown");
    }

    #[test]
    fn test_parse_articles_non_ok_status() {
        let json = r#"{"status": "error", "code": "apiKeyInvalid"}"#;
        let response: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert!(parse_articles(response).is_empty());
    }

    #[tokio::test]
    async fn test_static_source_returns_same_list() {
        let source = StaticSource::new(vec![
            Article::new("A", "https://example.com/a", "X"),
            Article::new("B", "https://example.com/b", "X"),
        ]);
        assert_eq!(source.fetch().await.len(), 2);
        assert_eq!(source.fetch().await.len(), 2);
    }

    #[tokio::test]
    async fn test_static_source_empty() {
        let source = StaticSource::empty();
        assert!(source.fetch().await.is_empty());
    }
}
