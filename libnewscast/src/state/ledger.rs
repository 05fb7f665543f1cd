//! Rate ledger: the rolling daily post counter
//!
//! Persisted as a single JSON object `{"count": N, "lastReset": ISO-8601}`.
//! The window is 24 hours from the last reset, not a calendar day. Callers
//! pass `now` explicitly, which keeps window arithmetic testable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, StateError};

/// Daily post accounting
pub trait RateLedger: Send {
    /// True iff another post is allowed in the current window.
    ///
    /// When the window has expired this resets the counter and persists the
    /// reset, even if the caller only wanted to inspect the state.
    fn is_within_daily_limit(&mut self, now: DateTime<Utc>) -> Result<bool>;

    /// Record one successful post and persist the new count
    fn record_post(&mut self, now: DateTime<Utc>) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct LedgerRecord {
    count: u32,
    #[serde(rename = "lastReset")]
    last_reset: DateTime<Utc>,
}

impl LedgerRecord {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            last_reset: now,
        }
    }

    fn window_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.last_reset >= Duration::hours(24)
    }
}

/// File-backed rate ledger
pub struct FileRateLedger {
    path: PathBuf,
    cap: u32,
}

impl FileRateLedger {
    pub fn new(path: &Path, cap: u32) -> Self {
        Self {
            path: path.to_path_buf(),
            cap,
        }
    }

    fn load(&self, now: DateTime<Utc>) -> Result<LedgerRecord> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let record: LedgerRecord =
                    serde_json::from_str(&content).map_err(StateError::Parse)?;
                Ok(record)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LedgerRecord::fresh(now)),
            Err(e) => Err(StateError::Io(e).into()),
        }
    }

    fn save(&self, record: &LedgerRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(StateError::Io)?;
        }
        let json = serde_json::to_string(record).map_err(StateError::Parse)?;
        std::fs::write(&self.path, json).map_err(StateError::Io)?;
        Ok(())
    }
}

impl RateLedger for FileRateLedger {
    fn is_within_daily_limit(&mut self, now: DateTime<Utc>) -> Result<bool> {
        let record = self.load(now)?;

        if record.window_expired(now) {
            self.save(&LedgerRecord::fresh(now))?;
            return Ok(true);
        }

        if record.count < self.cap {
            Ok(true)
        } else {
            tracing::info!(
                count = record.count,
                since = %record.last_reset,
                "daily post limit reached"
            );
            Ok(false)
        }
    }

    fn record_post(&mut self, now: DateTime<Utc>) -> Result<()> {
        let mut record = self.load(now)?;
        record.count += 1;
        self.save(&record)
    }
}

/// In-memory rate ledger for tests
pub struct MemoryRateLedger {
    cap: u32,
    record: LedgerRecord,
}

impl MemoryRateLedger {
    pub fn new(cap: u32, now: DateTime<Utc>) -> Self {
        Self {
            cap,
            record: LedgerRecord::fresh(now),
        }
    }

    /// Seed a ledger that already holds `count` posts in the current window
    pub fn with_count(cap: u32, count: u32, now: DateTime<Utc>) -> Self {
        Self {
            cap,
            record: LedgerRecord {
                count,
                last_reset: now,
            },
        }
    }

    pub fn count(&self) -> u32 {
        self.record.count
    }
}

impl RateLedger for MemoryRateLedger {
    fn is_within_daily_limit(&mut self, now: DateTime<Utc>) -> Result<bool> {
        if self.record.window_expired(now) {
            self.record = LedgerRecord::fresh(now);
            return Ok(true);
        }
        Ok(self.record.count < self.cap)
    }

    fn record_post(&mut self, _now: DateTime<Utc>) -> Result<()> {
        self.record.count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger_at(dir: &TempDir, cap: u32) -> FileRateLedger {
        FileRateLedger::new(&dir.path().join("ledger.json"), cap)
    }

    #[test]
    fn test_missing_file_allows_posting() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_at(&dir, 17);
        assert!(ledger.is_within_daily_limit(Utc::now()).unwrap());
    }

    #[test]
    fn test_cap_enforced_within_window() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_at(&dir, 3);
        let now = Utc::now();

        for _ in 0..3 {
            assert!(ledger.is_within_daily_limit(now).unwrap());
            ledger.record_post(now).unwrap();
        }

        assert!(!ledger.is_within_daily_limit(now).unwrap());
    }

    #[test]
    fn test_window_rollover_resets_count() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_at(&dir, 2);
        let start = Utc::now();

        ledger.record_post(start).unwrap();
        ledger.record_post(start).unwrap();
        assert!(!ledger.is_within_daily_limit(start).unwrap());

        // 25 hours later the window has rolled over
        let later = start + Duration::hours(25);
        assert!(ledger.is_within_daily_limit(later).unwrap());

        // The reset must have been persisted
        let content =
            std::fs::read_to_string(dir.path().join("ledger.json")).unwrap();
        let record: LedgerRecord = serde_json::from_str(&content).unwrap();
        assert_eq!(record.count, 0);
        assert_eq!(record.last_reset, later);
    }

    #[test]
    fn test_exactly_24h_rolls_over() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_at(&dir, 1);
        let start = Utc::now();

        ledger.record_post(start).unwrap();
        assert!(!ledger.is_within_daily_limit(start).unwrap());

        let boundary = start + Duration::hours(24);
        assert!(ledger.is_within_daily_limit(boundary).unwrap());
    }

    #[test]
    fn test_count_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let now = Utc::now();

        {
            let mut ledger = ledger_at(&dir, 17);
            ledger.is_within_daily_limit(now).unwrap();
            ledger.record_post(now).unwrap();
            ledger.record_post(now).unwrap();
        }

        let reopened = ledger_at(&dir, 17);
        let record = reopened.load(now).unwrap();
        assert_eq!(record.count, 2);
    }

    #[test]
    fn test_persisted_field_names() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_at(&dir, 17);
        let now = Utc::now();
        ledger.record_post(now).unwrap();

        let content = std::fs::read_to_string(dir.path().join("ledger.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(value.get("count").is_some());
        assert!(value.get("lastReset").is_some());
    }

    #[test]
    fn test_corrupt_ledger_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "not json").unwrap();

        let mut ledger = FileRateLedger::new(&path, 17);
        let result = ledger.is_within_daily_limit(Utc::now());
        assert!(matches!(
            result,
            Err(crate::NewscastError::State(StateError::Parse(_)))
        ));
    }

    #[test]
    fn test_memory_ledger_rollover() {
        let start = Utc::now();
        let mut ledger = MemoryRateLedger::with_count(2, 2, start);
        assert!(!ledger.is_within_daily_limit(start).unwrap());
        assert!(ledger
            .is_within_daily_limit(start + Duration::hours(24))
            .unwrap());
        assert_eq!(ledger.count(), 0);
    }
}
