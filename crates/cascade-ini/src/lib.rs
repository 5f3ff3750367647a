//! # cascade-ini
//!
//! Section-based INI parsing into an in-memory key/value store, with section
//! inheritance ("cascading"), typed accessors with defaults, and an optional
//! binary cache that replaces re-parsing while it is still fresh.
//!
//! # Architecture overview (for beginners)
//!
//! An INI document is a list of lines.  Some lines open a *section*
//! (`[database]`), some assign an *option* inside the current section
//! (`host = localhost`), and the rest are blank or comments.  This crate turns
//! such a document into a [`ConfigStore`]: a map of section name to option
//! name to string value.
//!
//! A section header may also name *parent* sections to inherit from:
//!
//! ```text
//! [db]
//! driver = postgres
//! host   = remotehost
//!
//! [testdb : db]
//! host = localhost
//! ```
//!
//! `testdb` receives every option `db` holds at that point of the document,
//! and its own `host` line then overrides the inherited one.
//!
//! The crate is split into four modules:
//!
//! - **`syntax`** – How text becomes entries.  Classifies each line, strips
//!   whitespace and quotes ("conforming"), and resolves inheritance chains in
//!   section headers.
//!
//! - **`store`** – The [`ConfigStore`] itself: section and option CRUD plus the
//!   typed accessors (`get_string`, `get_int`, `get_bool` and their
//!   default-substituting variants).
//!
//! - **`cache`** – Persisting a whole store to a compact binary snapshot and
//!   deciding whether a snapshot is still fresh compared to its source file.
//!
//! - **`loader`** – The construction entry points that tie the other three
//!   together: from a string, from a file, from a file with a cache, and from a
//!   cache alone.
//!
//! # Example
//!
//! ```rust
//! use cascade_ini::ConfigStore;
//!
//! let store = ConfigStore::from_ini_str("[server]\nport = 8080\n").unwrap();
//! assert_eq!(store.get_int("server", "port").unwrap(), 8080);
//! ```
//!
//! # Thread safety
//!
//! A [`ConfigStore`] has no internal synchronisation.  Several methods take
//! `&mut self` (including some lookups, see [`store::accessors`]), so sharing
//! one store across threads requires an external lock such as a `Mutex`.

pub mod cache;
pub mod loader;
pub mod store;
pub mod syntax;

// Re-export the most-used types at the crate root so callers can write
// `cascade_ini::ConfigStore` instead of `cascade_ini::store::config_store::ConfigStore`.
pub use cache::{BincodeFileCache, CacheError, CacheGateway};
pub use loader::{LoadError, LoadOptions, Loader};
pub use store::accessors::LookupError;
pub use store::config_store::{ConfigStore, DEFAULT_SECTION, IMPLICIT_SECTION};
pub use store::section::Section;
pub use syntax::parser::{parse_str, DocumentParser, ParseError};
