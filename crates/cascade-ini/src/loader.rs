//! Construction entry points.
//!
//! | Entry point                                  | Reads             |
//! |----------------------------------------------|-------------------|
//! | [`ConfigStore::from_ini_str`]                | a string          |
//! | [`ConfigStore::from_ini_file`]               | a document file   |
//! | [`ConfigStore::from_ini_file_with_cache`]    | document or cache |
//! | [`ConfigStore::from_cache`]                  | a cache file      |
//!
//! All four delegate to a [`Loader`], which can also be built directly to set
//! [`LoadOptions`] or to substitute the [`CacheGateway`].
//!
//! # How a file load with a cache decides (for beginners)
//!
//! ```text
//! open document ──(fails)──────────────────────────▶ LoadError::Io
//!      │
//!      ├─ cache fresh and not ignored? ──yes──▶ load cache ──ok──▶ done
//!      │                                            │
//!      │                                          fails (logged)
//!      ▼                                            │
//! parse document ◀──────────────────────────────────┘
//!      │
//!      └─ save cache (failure logged, load still succeeds) ──▶ done
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{BincodeFileCache, CacheError, CacheGateway};
use crate::store::config_store::ConfigStore;
use crate::syntax::parser::{DocumentParser, ParseError};

/// Errors that abort constructing a store.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A document string was empty.
    #[error("configuration string cannot be empty")]
    EmptyInput,

    /// The document file could not be opened or read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A reader supplied by the caller failed.
    #[error("I/O error reading configuration: {0}")]
    Read(#[source] std::io::Error),

    /// The document is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The cache could not be read.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Behaviour knobs applied to every store a [`Loader`] produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Snapshot file used for file loads and [`ConfigStore::save_cache`].
    pub cache_path: Option<PathBuf>,
    /// Re-parse file loads even when the cache is fresh.
    pub ignore_cache: bool,
    /// Initial value of [`ConfigStore::add_default_to_section`].
    pub add_default_to_section: bool,
}

/// Builds [`ConfigStore`]s from strings, readers, files and caches.
///
/// # Examples
///
/// ```rust
/// use cascade_ini::Loader;
///
/// let store = Loader::new()
///     .add_default_to_section(true)
///     .load_str("[s]\nk = v\n")
///     .unwrap();
/// assert!(store.add_default_to_section());
/// ```
#[derive(Debug, Clone)]
pub struct Loader<C = BincodeFileCache> {
    options: LoadOptions,
    cache: C,
}

impl Loader<BincodeFileCache> {
    /// Creates a loader with default options and the file-backed cache.
    pub fn new() -> Self {
        Self::with_gateway(LoadOptions::default(), BincodeFileCache)
    }
}

impl Default for Loader<BincodeFileCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CacheGateway> Loader<C> {
    /// Creates a loader with explicit options and cache gateway.
    pub fn with_gateway(options: LoadOptions, cache: C) -> Self {
        Self { options, cache }
    }

    /// Sets the cache file.
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.cache_path = Some(path.into());
        self
    }

    /// Re-parse file loads even when the cache is fresh.
    pub fn ignore_cache(mut self, flag: bool) -> Self {
        self.options.ignore_cache = flag;
        self
    }

    /// Write defaults into their sections when a lookup falls back.
    pub fn add_default_to_section(mut self, flag: bool) -> Self {
        self.options.add_default_to_section = flag;
        self
    }

    /// The options in effect.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Parses a document held in memory.  The cache is never consulted.
    ///
    /// # Errors
    ///
    /// [`LoadError::EmptyInput`] for an empty string, [`LoadError::Parse`] for
    /// a malformed document.
    pub fn load_str(&self, input: &str) -> Result<ConfigStore, LoadError> {
        if input.is_empty() {
            return Err(LoadError::EmptyInput);
        }
        let mut parser = DocumentParser::with_store(self.fresh_store());
        for line in input.lines() {
            parser.feed_line(line)?;
        }
        let store = parser.finish();
        info!("parsed string document ({} sections)", store.section_count());
        Ok(store)
    }

    /// Parses a document from any buffered reader.  The cache is never
    /// consulted.
    ///
    /// # Errors
    ///
    /// [`LoadError::Read`] if the reader fails, [`LoadError::Parse`] for a
    /// malformed document.
    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<ConfigStore, LoadError> {
        let mut parser = DocumentParser::with_store(self.fresh_store());
        for line in reader.lines() {
            parser.feed_line(&line.map_err(LoadError::Read)?)?;
        }
        Ok(parser.finish())
    }

    /// Loads a document file, preferring a fresh cache when one is configured.
    ///
    /// The document must be readable even when the cache would be used.
    /// After a successful parse the cache (if configured) is rewritten; a
    /// failed write is logged and does not fail the load.
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] if the document cannot be opened or read, and
    /// [`LoadError::Parse`] for a malformed document.  Cache read failures are
    /// not errors here; the loader falls back to parsing.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ConfigStore, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(store) = self.try_fresh_cache(path) {
            return Ok(store);
        }

        let mut store = self
            .load_reader(BufReader::new(file))
            .map_err(|e| match e {
                LoadError::Read(source) => LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })?;
        store.set_source_path(path);
        info!(
            "loaded {} ({} sections)",
            path.display(),
            store.section_count()
        );

        if store.cache_path().is_some() {
            if let Err(e) = self.cache.save(&store) {
                warn!("could not write cache for {}: {e}", path.display());
            }
        }
        Ok(store)
    }

    /// Restores a store straight from a cache file.
    ///
    /// # Errors
    ///
    /// [`LoadError::Cache`] if the snapshot cannot be read or decoded.
    pub fn load_cache(&self, cache: impl AsRef<Path>) -> Result<ConfigStore, LoadError> {
        let cache = cache.as_ref();
        let store = self.cache.load(cache)?;
        let store = self.apply_options(store, cache);
        info!(
            "restored {} from cache ({} sections)",
            cache.display(),
            store.section_count()
        );
        Ok(store)
    }

    /// Returns the cached store if the cache is configured, not ignored, fresh
    /// and readable.
    fn try_fresh_cache(&self, source: &Path) -> Option<ConfigStore> {
        let cache = self.options.cache_path.as_deref()?;
        if self.options.ignore_cache {
            debug!("ignoring cache {} by request", cache.display());
            return None;
        }
        if !self.cache.is_fresh(source, cache) {
            debug!("cache {} is stale or missing", cache.display());
            return None;
        }

        match self.cache.load(cache) {
            Ok(store) => {
                let mut store = self.apply_options(store, cache);
                store.set_source_path(source);
                info!(
                    "loaded {} from cache {} ({} sections)",
                    source.display(),
                    cache.display(),
                    store.section_count()
                );
                Some(store)
            }
            Err(e) => {
                warn!("cache {} unusable, re-parsing: {e}", cache.display());
                None
            }
        }
    }

    /// An empty store carrying this loader's options.
    fn fresh_store(&self) -> ConfigStore {
        let mut store = ConfigStore::new();
        store
            .set_add_default_to_section(self.options.add_default_to_section)
            .set_ignore_cache(self.options.ignore_cache);
        if let Some(cache) = &self.options.cache_path {
            store.set_cache_path(cache);
        }
        store
    }

    /// Applies this loader's flags to a store restored from `cache`.
    fn apply_options(&self, mut store: ConfigStore, cache: &Path) -> ConfigStore {
        store
            .set_add_default_to_section(self.options.add_default_to_section)
            .set_ignore_cache(self.options.ignore_cache)
            .set_cache_path(cache);
        store.mark_loaded(true);
        store
    }
}

// ── ConfigStore entry points ──────────────────────────────────────────────────

impl ConfigStore {
    /// Parses a document held in a string.  Caching is not used with strings.
    ///
    /// # Errors
    ///
    /// See [`Loader::load_str`].
    pub fn from_ini_str(input: &str) -> Result<Self, LoadError> {
        Loader::new().load_str(input)
    }

    /// Parses a document file.
    ///
    /// # Errors
    ///
    /// See [`Loader::load_file`].
    pub fn from_ini_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Loader::new().load_file(path)
    }

    /// Loads a document file, using the cache at `cache` when it is fresh and
    /// rewriting it after a parse.
    ///
    /// # Errors
    ///
    /// See [`Loader::load_file`].
    pub fn from_ini_file_with_cache(
        path: impl AsRef<Path>,
        cache: impl Into<PathBuf>,
    ) -> Result<Self, LoadError> {
        Loader::new().cache_path(cache).load_file(path)
    }

    /// Restores a store from a cache file.
    ///
    /// # Errors
    ///
    /// See [`Loader::load_cache`].
    pub fn from_cache(cache: impl AsRef<Path>) -> Result<Self, LoadError> {
        Loader::new().load_cache(cache)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
