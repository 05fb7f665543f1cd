//! Dedup store: the set of already-posted article identifiers
//!
//! Layout: UTF-8 text, one identifier per line, order-insensitive. The set
//! is loaded fully into memory at open and grows without bound; at tens of
//! thousands of identifiers this is still trivial.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, StateError};

/// Membership set of already-posted identifiers
///
/// `add` must persist immediately: the process may be killed between
/// cycles, and a lost identifier means a duplicate post.
pub trait DedupStore: Send {
    fn contains(&self, id: &str) -> bool;
    fn add(&mut self, id: &str) -> Result<()>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// File-backed dedup store
pub struct FileDedupStore {
    path: PathBuf,
    ids: HashSet<String>,
}

impl FileDedupStore {
    /// Open the store, loading all identifiers from `path`
    ///
    /// A missing file is an empty set, not an error.
    pub fn open(path: &Path) -> Result<Self> {
        let ids = match std::fs::read_to_string(path) {
            Ok(content) => content
                .lines()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(StateError::Io(e).into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            ids,
        })
    }
}

impl DedupStore for FileDedupStore {
    fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn add(&mut self, id: &str) -> Result<()> {
        if !self.ids.insert(id.to_string()) {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(StateError::Io)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(StateError::Io)?;
        writeln!(file, "{}", id).map_err(StateError::Io)?;
        file.flush().map_err(StateError::Io)?;

        Ok(())
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// In-memory dedup store for tests
#[derive(Default)]
pub struct MemoryDedupStore {
    ids: HashSet<String>,
}

impl MemoryDedupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DedupStore for MemoryDedupStore {
    fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn add(&mut self, id: &str) -> Result<()> {
        self.ids.insert(id.to_string());
        Ok(())
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileDedupStore::open(&dir.path().join("seen.txt")).unwrap();
        assert!(store.is_empty());
        assert!(!store.contains("anything"));
    }

    #[test]
    fn test_add_and_contains() {
        let dir = TempDir::new().unwrap();
        let mut store = FileDedupStore::open(&dir.path().join("seen.txt")).unwrap();

        store.add("id-1").unwrap();
        assert!(store.contains("id-1"));
        assert!(!store.contains("id-2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.txt");

        {
            let mut store = FileDedupStore::open(&path).unwrap();
            store.add("id-1").unwrap();
            store.add("id-2").unwrap();
        }

        let reopened = FileDedupStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert!(reopened.contains("id-1"));
        assert!(reopened.contains("id-2"));
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.txt");

        let mut store = FileDedupStore::open(&path).unwrap();
        store.add("id-1").unwrap();
        store.add("id-1").unwrap();
        assert_eq!(store.len(), 1);

        // The file must not grow either
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("seen.txt");

        let mut store = FileDedupStore::open(&path).unwrap();
        store.add("id-1").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_layout_one_id_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.txt");

        let mut store = FileDedupStore::open(&path).unwrap();
        store.add("aaa").unwrap();
        store.add("bbb").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines: Vec<&str> = content.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, vec!["aaa", "bbb"]);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryDedupStore::new();
        assert!(store.is_empty());
        store.add("x").unwrap();
        assert!(store.contains("x"));
        assert_eq!(store.len(), 1);
    }
}
