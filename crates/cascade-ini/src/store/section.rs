//! A named group of option/value pairs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::syntax::line::conform;

/// Options of one section, keyed by option name.
///
/// Names and values are always stored in their conformed form (see
/// [`crate::syntax::conform`]); [`Section::set`] enforces this, so a value
/// read back is never the raw text that was written.  Lookups match the
/// stored name exactly.
///
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section {
    options: HashMap<String, String>,
}

impl Section {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `option`, if present.
    pub fn get(&self, option: &str) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }

    /// Returns `true` if `option` is present.
    pub fn contains(&self, option: &str) -> bool {
        self.options.contains_key(option)
    }

    /// Inserts or overwrites `option`, conforming both name and value.
    ///
    /// Returns the previous value, if any.
    pub fn set(&mut self, option: &str, value: &str) -> Option<String> {
        self.options
            .insert(conform(option).to_string(), conform(value).to_string())
    }

    /// Removes `option`, returning its value if it was present.
    pub fn remove(&mut self, option: &str) -> Option<String> {
        self.options.remove(option)
    }

    /// Copies every option of `source` into `self`, overwriting collisions.
    ///
    /// Entries in `source` are already conformed, so they are copied verbatim.
    pub fn merge_from(&mut self, source: &Section) {
        for (option, value) in &source.options {
            self.options.insert(option.clone(), value.clone());
        }
    }

    /// Removes every option.
    pub fn clear(&mut self) {
        self.options.clear();
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` if the section holds no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates over `(option, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `(option, value)` pairs sorted by option name.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self.iter().collect();
        pairs.sort_unstable();
        pairs
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
