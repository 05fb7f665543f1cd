//! Publisher abstraction and implementations
//!
//! A publisher accepts final post text and either posts it, reports that
//! the provider is throttling us, or fails. Throttling is data, not an
//! error: the controller decides how long to back off.

use async_trait::async_trait;

use crate::error::Result;

pub mod twitter;

// Mock publisher is available for all builds (not just tests) to support
// integration tests
pub mod mock;

/// Outcome of a publish attempt that reached the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The post was accepted; `id` is the provider-assigned post id
    Posted { id: String },
    /// The provider is rate limiting us; `reset_epoch` is its hint (Unix
    /// seconds) for when capacity resumes, 0 when no hint was given
    Throttled { reset_epoch: i64 },
}

/// A posting destination
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `text` as a new post
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` for credential problems,
    /// `PlatformError::Network` for transport failures, and
    /// `PlatformError::Posting` for anything else the provider rejected.
    /// Provider throttling is NOT an error; it is `Ok(Throttled { .. })`.
    async fn publish(&self, text: &str) -> Result<PublishOutcome>;

    /// Lowercase identifier for the platform (e.g., "twitter")
    fn name(&self) -> &str;

    /// Maximum number of characters allowed in a post, if any
    fn character_limit(&self) -> Option<usize>;
}
