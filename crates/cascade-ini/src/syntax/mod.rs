//! Text-level processing of INI documents.
//!
//! Three layers, leaf to root:
//!
//! - [`line`] classifies a single line and conforms option names and values.
//! - [`cascade`] splits a section header body into the active section and the
//!   parents it inherits from.
//! - [`parser`] drives both over a whole document and fills a
//!   [`crate::ConfigStore`].

pub mod cascade;
pub mod line;
pub mod parser;

pub use cascade::SectionHeader;
pub use line::{classify, conform, Line, LineFault};
pub use parser::{parse_str, DocumentParser, ParseError};
