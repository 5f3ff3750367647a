//! File-backed [`CacheGateway`] using the bincode snapshot format.

use std::path::Path;

use tracing::debug;

use crate::cache::snapshot::{decode_snapshot, encode_snapshot};
use crate::cache::{is_fresh, CacheError, CacheGateway};
use crate::store::config_store::ConfigStore;

/// Stores snapshots as plain files on the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeFileCache;

impl CacheGateway for BincodeFileCache {
    fn is_fresh(&self, source: &Path, cache: &Path) -> bool {
        is_fresh(source, cache)
    }

    /// Creates the parent directory if needed and overwrites the cache file.
    fn save(&self, store: &ConfigStore) -> Result<(), CacheError> {
        let Some(path) = store.cache_path() else {
            return Ok(());
        };
        if !store.is_loaded() {
            return Ok(());
        }

        let bytes = encode_snapshot(store)?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| CacheError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, &bytes).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "wrote cache snapshot {} ({} sections, {} bytes)",
            path.display(),
            store.section_count(),
            bytes.len()
        );
        Ok(())
    }

    fn load(&self, cache: &Path) -> Result<ConfigStore, CacheError> {
        let bytes = std::fs::read(cache).map_err(|source| CacheError::Io {
            path: cache.to_path_buf(),
            source,
        })?;
        let mut store = decode_snapshot(&bytes)?;
        store.set_cache_path(cache);
        // `set_cache_path` clears the from-cache flag; restore it.
        store.mark_loaded(true);
        Ok(store)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
