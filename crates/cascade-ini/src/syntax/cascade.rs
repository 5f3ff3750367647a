//! Section headers and inheritance chains.
//!
//! A header body may name parents after the section itself, separated by
//! colons:
//!
//! ```text
//! [child : parentA : parentB]
//! ```
//!
//! The first name becomes the active section.  Each parent is then merged
//! into it from left to right, so `parentB` wins over `parentA` when both
//! define the same option.  Explicit assignments that follow the header are
//! applied later still and therefore win over every parent.
//!
//! Parents are resolved immediately: only sections that already exist at the
//! point of the header contribute.  A parent declared further down the
//! document merges nothing.

use tracing::debug;

use crate::store::config_store::ConfigStore;

/// Separator between the section name and its parents.
const CHAIN_SEPARATOR: char = ':';

/// A parsed header body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader<'a> {
    /// The section that subsequent assignments target.
    pub name: &'a str,
    /// Parents to merge into `name`, in declaration order.
    pub parents: Vec<&'a str>,
}

impl<'a> SectionHeader<'a> {
    /// Splits a header body into the section name and its parents.
    ///
    /// Every piece is trimmed.  A body without `:` yields no parents.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cascade_ini::syntax::SectionHeader;
    ///
    /// let header = SectionHeader::parse(" testdb : db ");
    /// assert_eq!(header.name, "testdb");
    /// assert_eq!(header.parents, vec!["db"]);
    /// ```
    pub fn parse(body: &'a str) -> Self {
        let mut pieces = body.split(CHAIN_SEPARATOR).map(str::trim);
        // `split` always yields at least one piece, even for an empty body.
        let name = pieces.next().unwrap_or_default();
        Self {
            name,
            parents: pieces.collect(),
        }
    }

    /// Returns `true` if the header declares at least one parent.
    pub fn is_cascade(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Applies this header to `store` and returns the name of the active section.
    ///
    /// A plain header only switches the active section; the section itself is
    /// created by the first assignment that targets it.  A cascading header
    /// creates the section straight away (even when every parent is missing)
    /// and folds each parent into it in order.
    pub fn resolve(&self, store: &mut ConfigStore) -> String {
        for parent in &self.parents {
            if !store.is_section(parent) {
                debug!(
                    "section [{}] inherits from undefined section [{}]; nothing merged",
                    self.name, parent
                );
            } else {
                debug!("merging section [{}] into [{}]", parent, self.name);
            }
            store.merge_options(self.name, parent);
        }
        if !self.is_cascade() {
            debug!("entering section [{}]", self.name);
        }
        self.name.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
