//! Binary cache of whole stores.
//!
//! # What is the cache for? (for beginners)
//!
//! Parsing a large document on every start-up costs time.  The cache stores
//! a binary snapshot of the parsed store next to the document.  On the next
//! load, if the snapshot is at least as new as the document, the snapshot is
//! restored instead of re-parsing the text.
//!
//! The cache is reached through the [`CacheGateway`] trait so the loader's
//! decisions (use the cache, fall back, write it back) can be tested without
//! touching the file system.  [`BincodeFileCache`] is the real implementation.

pub mod file;
pub mod snapshot;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::trace;

pub use file::BincodeFileCache;

use crate::store::config_store::ConfigStore;

/// Errors raised while reading or writing a cache snapshot.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A file-system operation on the cache file failed.
    #[error("I/O error accessing cache at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store could not be serialised.
    #[error("failed to encode cache snapshot: {0}")]
    Encode(#[source] bincode::Error),

    /// The snapshot body is corrupt.
    #[error("failed to decode cache snapshot: {0}")]
    Decode(#[source] bincode::Error),

    /// The file does not start with the snapshot signature.
    #[error("not a cache snapshot (bad magic)")]
    BadMagic,

    /// The snapshot was written by an incompatible format version.
    #[error("unsupported cache format version: {0}")]
    UnsupportedVersion(u8),
}

/// Persist/restore pair for whole stores, keyed by a freshness check.
#[cfg_attr(test, mockall::automock)]
pub trait CacheGateway {
    /// Returns `true` if the snapshot at `cache` may be used instead of
    /// parsing `source`.
    fn is_fresh(&self, source: &Path, cache: &Path) -> bool;

    /// Writes `store` to its configured cache path.
    ///
    /// Does nothing unless the store is loaded and has a cache path.
    fn save(&self, store: &ConfigStore) -> Result<(), CacheError>;

    /// Restores a store from the snapshot at `cache`.
    fn load(&self, cache: &Path) -> Result<ConfigStore, CacheError>;
}

/// Returns `true` if both files can be stat'ed, the cache is non-empty, and
/// the cache was modified at or after the source.
///
/// Any stat failure (including a missing file) counts as "not fresh".
pub fn is_fresh(source: &Path, cache: &Path) -> bool {
    let (Ok(source_meta), Ok(cache_meta)) = (std::fs::metadata(source), std::fs::metadata(cache))
    else {
        trace!("cache {} or source {} cannot be stat'ed", cache.display(), source.display());
        return false;
    };
    if cache_meta.len() == 0 {
        return false;
    }
    match (source_meta.modified(), cache_meta.modified()) {
        (Ok(source_mtime), Ok(cache_mtime)) => cache_mtime >= source_mtime,
        _ => false,
    }
}

// ── Store-level cache helpers ─────────────────────────────────────────────────

impl ConfigStore {
    /// Returns `true` if the store has both a source and a cache path and the
    /// cache is fresh relative to the source.
    pub fn is_cache_fresh(&self) -> bool {
        match (self.source_path(), self.cache_path()) {
            (Some(source), Some(cache)) => BincodeFileCache.is_fresh(source, cache),
            _ => false,
        }
    }

    /// Writes the store to its cache path, unconditionally overwriting it.
    ///
    /// Does nothing unless the store is loaded and a cache path is set.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the snapshot cannot be encoded or written.
    pub fn save_cache(&self) -> Result<(), CacheError> {
        BincodeFileCache.save(self)
    }

    /// Replaces every section with the snapshot at the store's cache path.
    ///
    /// Flags and paths are kept; the store becomes loaded and from-cache.
    /// Without a cache path this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the snapshot cannot be read or decoded.  The
    /// store is left unchanged in that case.
    pub fn reload_from_cache(&mut self) -> Result<&mut Self, CacheError> {
        let Some(path) = self.cache_path().map(Path::to_path_buf) else {
            return Ok(self);
        };
        let restored = BincodeFileCache.load(&path)?;
        self.replace_sections(restored.into_sections());
        self.mark_loaded(true);
        Ok(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cascade_ini_test_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    // ── is_fresh ──────────────────────────────────────────────────────────────

    #[test]
    fn test_is_fresh_when_cache_newer_than_source() {
        // Arrange
        let dir = scratch_dir();
        let source = dir.join("app.ini");
        let cache = dir.join("app.cache");
        fs::write(&source, "[s]\nk=v\n").unwrap();
        fs::write(&cache, b"CINI\x01").unwrap();
        let now = SystemTime::now();
        set_mtime(&source, now - Duration::from_secs(60));
        set_mtime(&cache, now);

        // Act / Assert
        assert!(is_fresh(&source, &cache));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_is_fresh_when_mtimes_are_equal() {
        let dir = scratch_dir();
        let source = dir.join("app.ini");
        let cache = dir.join("app.cache");
        fs::write(&source, "x=1").unwrap();
        fs::write(&cache, b"data").unwrap();
        let t = SystemTime::now() - Duration::from_secs(10);
        set_mtime(&source, t);
        set_mtime(&cache, t);

        assert!(is_fresh(&source, &cache));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_not_fresh_when_source_newer_than_cache() {
        let dir = scratch_dir();
        let source = dir.join("app.ini");
        let cache = dir.join("app.cache");
        fs::write(&source, "x=1").unwrap();
        fs::write(&cache, b"data").unwrap();
        let now = SystemTime::now();
        set_mtime(&cache, now - Duration::from_secs(60));
        set_mtime(&source, now);

        assert!(!is_fresh(&source, &cache));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_not_fresh_when_cache_is_empty() {
        let dir = scratch_dir();
        let source = dir.join("app.ini");
        let cache = dir.join("app.cache");
        fs::write(&source, "x=1").unwrap();
        fs::write(&cache, b"").unwrap();
        set_mtime(&source, SystemTime::now() - Duration::from_secs(60));

        assert!(!is_fresh(&source, &cache));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_not_fresh_when_either_file_is_missing() {
        let dir = scratch_dir();
        let present = dir.join("present");
        fs::write(&present, "x=1").unwrap();

        assert!(!is_fresh(&present, &dir.join("missing.cache")));
        assert!(!is_fresh(&dir.join("missing.ini"), &present));

        fs::remove_dir_all(&dir).ok();
    }

    // ── ConfigStore helpers ───────────────────────────────────────────────────

    #[test]
    fn test_is_cache_fresh_false_without_paths() {
        assert!(!ConfigStore::new().is_cache_fresh());
        assert!(!ConfigStore::with_cache_path("/tmp/only-cache").is_cache_fresh());
    }

    #[test]
    fn test_save_cache_then_reload_restores_sections() {
        // Arrange
        let dir = scratch_dir();
        let cache = dir.join("store.cache");
        let mut store = crate::syntax::parser::parse_str("[s]\nk = v\n").unwrap();
        store.set_cache_path(&cache);
        store.save_cache().unwrap();
        store.set_string("s", "k", "changed");

        // Act
        store.reload_from_cache().unwrap();

        // Assert
        assert_eq!(store.get_string("s", "k").unwrap(), "v");
        assert!(store.is_from_cache());
        assert_eq!(store.cache_path(), Some(cache.as_path()));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reload_from_cache_failure_leaves_store_untouched() {
        let dir = scratch_dir();
        let mut store = crate::syntax::parser::parse_str("[s]\nk = v\n").unwrap();
        store.set_cache_path(dir.join("absent.cache"));

        let result = store.reload_from_cache();

        assert!(matches!(result, Err(CacheError::Io { .. })));
        assert_eq!(store.get_string("s", "k").unwrap(), "v");
        assert!(!store.is_from_cache());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reload_without_cache_path_is_noop() {
        let mut store = ConfigStore::new();
        store.reload_from_cache().unwrap();
        assert!(!store.is_loaded());
    }
}
