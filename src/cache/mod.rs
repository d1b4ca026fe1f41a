//! Versioned on-disk cache of parsed snapshot rows.
//!
//! Entries are keyed by the SHA-1 of the raw document bytes, so a document
//! version is parsed once no matter how often the history is replayed.
//! Bumping `CACHE_VERSION` invalidates every existing entry.

use crate::model::Snapshot;
use crate::util::write_atomic;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CACHE_VERSION: u32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Cache serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    version: u32,
    rows: Vec<Snapshot>,
}

#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    pub fn new(dir: &Path) -> CacheResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn key(content: &[u8]) -> String {
        let mut hasher = Sha1::new();
        hasher.update(content);
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Cached rows for `key`, if present and written by this cache version.
    pub fn get(&self, key: &str) -> Option<Vec<Snapshot>> {
        let path = self.entry_path(key);
        let raw = fs::read(&path).ok()?;

        match serde_json::from_slice::<CacheEntry>(&raw) {
            Ok(entry) if entry.version == CACHE_VERSION => Some(entry.rows),
            Ok(_) => None,
            Err(e) => {
                eprintln!("⚠️  Ignoring unreadable cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn put(&self, key: &str, rows: &[Snapshot]) -> CacheResult<()> {
        let entry = CacheEntry {
            version: CACHE_VERSION,
            rows: rows.to_vec(),
        };
        write_atomic(&self.entry_path(key), &serde_json::to_vec(&entry)?)?;
        Ok(())
    }

    /// Rows for `content`, parsing and storing them on a miss.
    ///
    /// A failed store is only warned about; the parsed rows are returned.
    pub fn get_or_parse<F, E>(&self, content: &[u8], parse: F) -> std::result::Result<Vec<Snapshot>, E>
    where
        F: FnOnce(&[u8]) -> std::result::Result<Vec<Snapshot>, E>,
    {
        let key = Self::key(content);
        if let Some(rows) = self.get(&key) {
            return Ok(rows);
        }

        let rows = parse(content)?;
        if let Err(e) = self.put(&key, &rows) {
            eprintln!(
                "⚠️  Could not write cache entry {}: {}",
                self.entry_path(&key).display(),
                e
            );
        }
        Ok(rows)
    }
}
