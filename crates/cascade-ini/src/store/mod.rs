//! The in-memory option store.
//!
//! This module contains pure data handling with no file-system access.  It
//! can be built and inspected entirely in memory, which keeps it easy to
//! unit-test; reading documents and caches is the job of [`crate::loader`]
//! and [`crate::cache`].

/// The top-level store: section CRUD and store metadata.
///
/// See [`config_store::ConfigStore`] for the main type.
pub mod config_store;

/// Typed getters (`string`, `int`, `bool`) and their default variants.
pub mod accessors;

/// Integer and boolean literal parsing used by the typed getters.
pub mod literal;

/// A single section's option map.
pub mod section;

pub use accessors::LookupError;
pub use config_store::{ConfigStore, DEFAULT_SECTION, IMPLICIT_SECTION};
pub use section::Section;
