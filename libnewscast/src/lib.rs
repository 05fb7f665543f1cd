//! Newscast - headline bot for the bird site
//!
//! This library provides core functionality for polling a news feed and
//! republishing unseen headlines, with a persisted daily post cap and
//! provider throttle handling.

pub mod compose;
pub mod config;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod news;
pub mod platforms;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use controller::{CycleOutcome, PostingController, SkipReason, Sleeper, TokioSleeper};
pub use error::{NewscastError, Result};
pub use news::Article;
pub use platforms::{PublishOutcome, Publisher};
pub use state::{DedupStore, RateLedger};
