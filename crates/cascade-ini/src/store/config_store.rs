//! The configuration store: section name → [`Section`].
//!
//! # Section names
//!
//! Section names are case-sensitive and trimmed on every insertion and
//! lookup, so `[ db ]`, `"db"` and `" db"` all address the same section.
//! Unlike option names, section names are **not** quote-stripped.
//!
//! # The `_default` section
//!
//! Every store owns a bookkeeping section called [`DEFAULT_SECTION`].  It is
//! created together with the store and records each lookup that fell back to
//! a caller-supplied default: `_default[section] = option`.  See
//! [`crate::store::accessors`] for which getters record.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::store::section::Section;

/// Name of the bookkeeping section that records defaulted lookups.
pub const DEFAULT_SECTION: &str = "_default";

/// Section that receives assignments appearing before the first header.
pub const IMPLICIT_SECTION: &str = "default";

/// Initial capacity of the section map.
const PREALLOCATED_SECTIONS: usize = 10;

/// Trims a section name for insertion or lookup.
fn conform_section_name(name: &str) -> &str {
    name.trim()
}

/// All sections of a configuration plus the flags that describe how it was
/// loaded.
///
/// The store exclusively owns its sections.  Nothing here is synchronised;
/// wrap it in a lock if it must be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStore {
    /// Section name → options.
    sections: HashMap<String, Section>,
    /// When `true`, a defaulted lookup also writes the default into its section.
    add_default_to_section: bool,
    /// `true` once a parse or cache load has completed.
    loaded: bool,
    /// `true` if the current contents came from a cache snapshot.
    from_cache: bool,
    /// When `true`, file loads re-parse even if the cache is fresh.
    ignore_cache: bool,
    /// Document this store was parsed from, if any.
    source_path: Option<PathBuf>,
    /// Snapshot file used by [`ConfigStore::save_cache`], if any.
    cache_path: Option<PathBuf>,
}

impl ConfigStore {
    /// Creates an empty store containing only the `_default` section.
    pub fn new() -> Self {
        let mut store = Self {
            sections: HashMap::with_capacity(PREALLOCATED_SECTIONS),
            add_default_to_section: false,
            loaded: false,
            from_cache: false,
            ignore_cache: false,
            source_path: None,
            cache_path: None,
        };
        store.add_section(DEFAULT_SECTION);
        store
    }

    /// Creates an empty store with a cache path configured.
    ///
    /// The cache is not read; call [`ConfigStore::reload_from_cache`] for that.
    pub fn with_cache_path(cache_path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new();
        store.cache_path = Some(cache_path.into());
        store
    }

    /// Rebuilds a store from a snapshot's section map.
    ///
    /// The `_default` section is re-created if the snapshot lacks it.
    pub(crate) fn from_sections(sections: HashMap<String, Section>) -> Self {
        let mut store = Self::new();
        store.replace_sections(sections);
        store
    }

    /// Swaps in a new section map, keeping the flags and paths.
    pub(crate) fn replace_sections(&mut self, sections: HashMap<String, Section>) {
        self.sections = sections;
        self.add_section(DEFAULT_SECTION);
    }

    /// Read-only view of the whole section map, for serialisation.
    pub(crate) fn sections_map(&self) -> &HashMap<String, Section> {
        &self.sections
    }

    /// Consumes the store, returning its section map.
    pub(crate) fn into_sections(self) -> HashMap<String, Section> {
        self.sections
    }

    // ── Section operations ────────────────────────────────────────────────────

    /// Returns the section called `name`, creating it empty if absent.
    pub fn add_section(&mut self, name: &str) -> &mut Section {
        self.sections
            .entry(conform_section_name(name).to_string())
            .or_default()
    }

    /// Returns the section called `name`, or `None` if it does not exist.
    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.sections.get(conform_section_name(name))
    }

    /// Returns `true` if a section called `name` exists.
    pub fn is_section(&self, name: &str) -> bool {
        self.sections.contains_key(conform_section_name(name))
    }

    /// Removes a section and all of its options.  Missing sections are ignored.
    pub fn delete_section(&mut self, name: &str) -> &mut Self {
        if let Some(mut section) = self.sections.remove(conform_section_name(name)) {
            section.clear();
        }
        self
    }

    /// Names of all sections, including `_default`, in unspecified order.
    ///
    /// A section with an empty name (from an `[]` header) is counted by
    /// [`ConfigStore::section_count`] but never listed here.
    pub fn section_names(&self) -> Vec<String> {
        self.sections
            .keys()
            .filter(|name| !name.is_empty())
            .cloned()
            .collect()
    }

    /// Number of sections, including `_default`.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Iterates over `(name, section)` pairs in unspecified order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    // ── Option operations ─────────────────────────────────────────────────────

    /// Sets `option` in `section` to `value`, creating the section if needed.
    ///
    /// Both `option` and `value` are conformed before they are stored.
    pub fn set_string(&mut self, section: &str, option: &str, value: &str) {
        self.add_section(section).set(option, value);
    }

    /// Returns `true` if `section` exists and contains `option`.
    pub fn is_option(&self, section: &str, option: &str) -> bool {
        self.get_section(section)
            .is_some_and(|options| options.contains(option))
    }

    /// Removes `option` from `section`.  Missing sections or options are ignored.
    pub fn delete_option(&mut self, section: &str, option: &str) -> &mut Self {
        if let Some(options) = self.sections.get_mut(conform_section_name(section)) {
            options.remove(option);
        }
        self
    }

    /// Copies every option of `source` into `target`, overwriting collisions.
    ///
    /// `target` is created if it does not exist, even when `source` is
    /// missing (in which case nothing is copied).
    pub fn merge_options(&mut self, target: &str, source: &str) -> &mut Self {
        // Clone first: `source` may name the same section as `target`.
        let source = self.get_section(source).cloned();
        let target = self.add_section(target);
        if let Some(source) = source {
            target.merge_from(&source);
        }
        self
    }

    // ── Flags and paths ───────────────────────────────────────────────────────

    /// `true` once a parse or cache load has completed successfully.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// `true` if the current contents were restored from a cache snapshot.
    pub fn is_from_cache(&self) -> bool {
        self.from_cache
    }

    pub(crate) fn mark_loaded(&mut self, from_cache: bool) {
        self.loaded = true;
        self.from_cache = from_cache;
    }

    /// Whether defaulted lookups also write the default into their section.
    pub fn add_default_to_section(&self) -> bool {
        self.add_default_to_section
    }

    /// Sets whether defaulted lookups also write the default into their section.
    pub fn set_add_default_to_section(&mut self, flag: bool) -> &mut Self {
        self.add_default_to_section = flag;
        self
    }

    /// Whether file loads skip the cache even when it is fresh.
    pub fn ignore_cache(&self) -> bool {
        self.ignore_cache
    }

    /// Sets whether file loads skip the cache even when it is fresh.
    pub fn set_ignore_cache(&mut self, flag: bool) -> &mut Self {
        self.ignore_cache = flag;
        self
    }

    /// The document this store was parsed from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub(crate) fn set_source_path(&mut self, path: impl Into<PathBuf>) {
        self.source_path = Some(path.into());
    }

    /// The snapshot file used by [`ConfigStore::save_cache`], if any.
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// Sets the snapshot file.  The data is left untouched, but the store no
    /// longer counts as loaded from cache.
    pub fn set_cache_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.cache_path = Some(path.into());
        self.from_cache = false;
        self
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable dump with sections and options sorted by name.
///
/// ```text
/// ;
/// ;  OnDefaultAddToSection is false
/// ;
/// [_default]
/// [db]
///     'host' = 'localhost'
/// ```
impl fmt::Display for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";")?;
        writeln!(f, ";  OnDefaultAddToSection is {}", self.add_default_to_section)?;
        writeln!(f, ";")?;

        let mut names: Vec<&String> = self.sections.keys().collect();
        names.sort_unstable();
        for name in names {
            writeln!(f, "[{name}]")?;
            for (option, value) in self.sections[name].sorted() {
                writeln!(f, "\t'{option}' = '{value}'")?;
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
