// Memoizes values derived from a source file, keyed on the file's identity.
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

use crate::error::Result;

/// Cheap identity (size + mtime) plus the content hash used to confirm a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub len: u64,
    pub modified: Option<SystemTime>,
    pub sha256: [u8; 32],
}

impl SourceFingerprint {
    pub fn compute(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        let bytes = std::fs::read(path)?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
            sha256: Sha256::digest(&bytes).into(),
        })
    }

    fn same_metadata(&self, meta: &std::fs::Metadata) -> bool {
        self.len == meta.len() && self.modified.is_some() && self.modified == meta.modified().ok()
    }

    pub fn hex_digest(&self) -> String {
        hex::encode(self.sha256)
    }
}

struct CacheEntry<T> {
    fingerprint: SourceFingerprint,
    value: Arc<T>,
}

/// Values derived from files, re-derived only when a file's content changes.
pub struct SourceCache<T> {
    entries: HashMap<PathBuf, CacheEntry<T>>,
}

impl<T> SourceCache<T> {
    pub fn new() -> Self {
        SourceCache {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached value for `path`, running `loader` on first use and whenever
    /// the file's content hash differs from the one the value was derived from.
    pub fn get_or_load<F>(&mut self, path: &Path, loader: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        // Size and mtime are a stat call; hashing reads the whole workbook.
        let meta = std::fs::metadata(path)?;
        if let Some(entry) = self.entries.get(path) {
            if entry.fingerprint.same_metadata(&meta) {
                debug!(path = %path.display(), "Source cache hit");
                return Ok(entry.value.clone());
            }
        }

        // Metadata moved (copy, touch, sync tool): only a different hash means new content.
        let fingerprint = SourceFingerprint::compute(path)?;
        if let Some(entry) = self.entries.get_mut(path) {
            if entry.fingerprint.sha256 == fingerprint.sha256 {
                debug!(path = %path.display(), "Source metadata changed, content unchanged");
                entry.fingerprint = fingerprint;
                return Ok(entry.value.clone());
            }
        }

        info!(path = %path.display(), digest = %fingerprint.hex_digest(), "Deriving from source");
        let value = Arc::new(loader(path)?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                fingerprint,
                value: value.clone(),
            },
        );
        Ok(value)
    }

    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops every entry except the one for `path`.
    pub fn retain_only(&mut self, path: &Path) {
        self.entries.retain(|p, _| p == path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for SourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
