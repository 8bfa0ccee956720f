//! Where original filings are fetched from

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{RectifierError, Result};

/// Source of raw filing bytes, keyed by the paths named in a request
pub trait FilingStore: Sync {
    fn fetch(&self, path: &str) -> Result<Vec<u8>>;
}

/// Filings stored under a local directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FilingStore for DirectoryStore {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.root.join(path);
        fs::read(&full_path).map_err(|e| RectifierError::FilingUnavailable {
            path: full_path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Filings held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl<P: Into<String>, C: Into<Vec<u8>>> FromIterator<(P, C)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (path, contents) in iter {
            store.insert(path, contents);
        }
        store
    }
}

impl FilingStore for MemoryStore {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| RectifierError::FilingUnavailable {
                path: path.to_string(),
                reason: "not found".to_string(),
            })
    }
}
