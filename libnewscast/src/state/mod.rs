//! Persisted state: the dedup set and the daily post ledger
//!
//! Both stores are plain files so the bot survives restarts without a
//! database. Each is behind a small trait so the posting controller can be
//! tested against in-memory implementations.

pub mod dedup;
pub mod ledger;

pub use dedup::{DedupStore, FileDedupStore, MemoryDedupStore};
pub use ledger::{FileRateLedger, MemoryRateLedger, RateLedger};
