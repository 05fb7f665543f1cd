//! The posting cycle
//!
//! One cycle: check the daily ledger, fetch candidates, pick the first
//! unseen one, compose the post, publish it, and record success in both
//! stores. At most one post per cycle. Provider throttling is absorbed
//! here with a bounded wait; store failures propagate because running
//! without persisted state means double-posting.

use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

use crate::compose::compose;
use crate::error::Result;
use crate::news::ContentSource;
use crate::platforms::{PublishOutcome, Publisher};
use crate::state::{DedupStore, RateLedger};

/// Why a cycle ended without a publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The daily cap has been reached for the current window
    DailyCapReached,
    /// The source yielded no candidates (includes swallowed fetch errors)
    NoCandidates,
    /// Every candidate has already been posted
    NoUnseen,
}

/// Terminal state of one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Exactly one item was published; `post_id` is the provider's id
    Posted { post_id: String },
    Skipped(SkipReason),
    /// The provider throttled us and we waited `waited` before yielding
    Throttled { waited: Duration },
    /// The publish attempt failed; neither store was touched
    Failed,
}

/// Delay capability for the throttle backoff
///
/// Injected so the wait can be observed in tests and replaced with a
/// non-blocking implementation by a different scheduler.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Drives one posting cycle per invocation
///
/// Stateless between cycles apart from the two injected stores.
pub struct PostingController {
    source: Box<dyn ContentSource>,
    publisher: Box<dyn Publisher>,
    dedup: Box<dyn DedupStore>,
    ledger: Box<dyn RateLedger>,
    sleeper: Box<dyn Sleeper>,
    throttle_floor: Duration,
    max_post_chars: usize,
}

impl PostingController {
    pub fn new(
        source: Box<dyn ContentSource>,
        publisher: Box<dyn Publisher>,
        dedup: Box<dyn DedupStore>,
        ledger: Box<dyn RateLedger>,
        sleeper: Box<dyn Sleeper>,
        throttle_floor: Duration,
        max_post_chars: usize,
    ) -> Self {
        Self {
            source,
            publisher,
            dedup,
            ledger,
            sleeper,
            throttle_floor,
            max_post_chars,
        }
    }

    /// Run one posting cycle
    ///
    /// # Errors
    ///
    /// Only persisted-state failures are returned; everything the provider
    /// or the news feed does wrong is folded into the outcome.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let now = Utc::now();

        if !self.ledger.is_within_daily_limit(now)? {
            info!("cycle skipped: daily post limit reached");
            return Ok(CycleOutcome::Skipped(SkipReason::DailyCapReached));
        }

        let candidates = self.source.fetch().await;
        if candidates.is_empty() {
            info!(source = self.source.name(), "cycle skipped: no candidates");
            return Ok(CycleOutcome::Skipped(SkipReason::NoCandidates));
        }

        // First unseen in source order wins; no scoring.
        let Some(article) = candidates
            .iter()
            .find(|a| !self.dedup.contains(&a.dedup_id()))
        else {
            info!("cycle skipped: no new articles to post");
            return Ok(CycleOutcome::Skipped(SkipReason::NoUnseen));
        };

        let text = compose(article, self.max_post_chars);

        match self.publisher.publish(&text).await {
            Ok(PublishOutcome::Posted { id }) => {
                self.dedup.add(&article.dedup_id())?;
                self.ledger.record_post(Utc::now())?;
                info!(
                    platform = self.publisher.name(),
                    post_id = %id,
                    title = %article.title,
                    "posted article"
                );
                Ok(CycleOutcome::Posted { post_id: id })
            }
            Ok(PublishOutcome::Throttled { reset_epoch }) => {
                let wait = self.throttle_wait(reset_epoch);
                warn!(
                    platform = self.publisher.name(),
                    reset_epoch,
                    wait_secs = wait.as_secs(),
                    "provider throttled, backing off"
                );
                self.sleeper.sleep(wait).await;
                Ok(CycleOutcome::Throttled { waited: wait })
            }
            Err(e) => {
                warn!(platform = self.publisher.name(), "publish failed: {}", e);
                Ok(CycleOutcome::Failed)
            }
        }
    }

    /// Seconds until the provider's hinted reset, never below the floor
    fn throttle_wait(&self, reset_epoch: i64) -> Duration {
        let now = Utc::now().timestamp();
        let until_reset = reset_epoch.saturating_sub(now).max(0) as u64;
        Duration::from_secs(until_reset).max(self.throttle_floor)
    }
}
