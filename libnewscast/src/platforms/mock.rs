//! Mock publisher implementation for testing
//!
//! A scripted publisher that replays a queue of outcomes and records what
//! was published, so controller behavior can be verified without network
//! access or credentials.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{PlatformError, Result};
use crate::platforms::{PublishOutcome, Publisher};

/// One scripted response from the mock
#[derive(Debug, Clone)]
pub enum MockResponse {
    Posted,
    Throttled { reset_epoch: i64 },
    Fail(String),
    AuthFail(String),
}

/// Mock publisher for tests
pub struct MockPublisher {
    name: String,
    script: Mutex<VecDeque<MockResponse>>,
    publish_count: Arc<Mutex<usize>>,
    published: Arc<Mutex<Vec<String>>>,
}

impl MockPublisher {
    /// A publisher that follows `script`, then keeps succeeding
    pub fn with_script(name: &str, script: Vec<MockResponse>) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(script.into()),
            publish_count: Arc::new(Mutex::new(0)),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A publisher that accepts every post
    pub fn always_posted(name: &str) -> Self {
        Self::with_script(name, Vec::new())
    }

    /// A publisher that throttles the next attempt with the given hint
    pub fn throttled(name: &str, reset_epoch: i64) -> Self {
        Self::with_script(name, vec![MockResponse::Throttled { reset_epoch }])
    }

    /// A publisher whose next attempt fails with a posting error
    pub fn failing(name: &str, error: &str) -> Self {
        Self::with_script(name, vec![MockResponse::Fail(error.to_string())])
    }

    /// Number of publish calls made so far
    pub fn publish_count(&self) -> usize {
        *self.publish_count.lock().unwrap()
    }

    /// All texts that were accepted as posted
    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    /// Shared handle to the posted-text log, usable after the publisher has
    /// been handed to a controller
    pub fn published_handle(&self) -> Arc<Mutex<Vec<String>>> {
        self.published.clone()
    }

    /// Shared handle to the publish-call counter
    pub fn publish_count_handle(&self) -> Arc<Mutex<usize>> {
        self.publish_count.clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(&self, text: &str) -> Result<PublishOutcome> {
        let n = {
            let mut count = self.publish_count.lock().unwrap();
            *count += 1;
            *count
        };

        let response = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockResponse::Posted);

        match response {
            MockResponse::Posted => {
                self.published.lock().unwrap().push(text.to_string());
                Ok(PublishOutcome::Posted {
                    id: format!("{}:mock-{}", self.name, n),
                })
            }
            MockResponse::Throttled { reset_epoch } => {
                Ok(PublishOutcome::Throttled { reset_epoch })
            }
            MockResponse::Fail(msg) => Err(PlatformError::Posting(msg).into()),
            MockResponse::AuthFail(msg) => Err(PlatformError::Authentication(msg).into()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn character_limit(&self) -> Option<usize> {
        Some(280)
    }
}
