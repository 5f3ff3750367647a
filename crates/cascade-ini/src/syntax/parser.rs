//! Document parser: feeds lines through the classifier and cascade resolver
//! into a [`ConfigStore`].

use thiserror::Error;
use tracing::trace;

use crate::store::config_store::{ConfigStore, IMPLICIT_SECTION};
use crate::syntax::cascade::SectionHeader;
use crate::syntax::line::{classify, Line, LineFault};

/// Structural errors that abort a parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A header is missing its closing `]` (or starts with a stray `]`).
    #[error("invalid section marker on line {line_number}: {line}")]
    MalformedSection { line_number: usize, line: String },

    /// A line is neither blank, a comment, a header, nor a `key=value` pair.
    #[error("invalid key/value pair on line {line_number}: {line}")]
    MalformedAssignment { line_number: usize, line: String },
}

impl ParseError {
    /// 1-based number of the offending line.
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedSection { line_number, .. }
            | Self::MalformedAssignment { line_number, .. } => *line_number,
        }
    }
}

/// Incremental parser that consumes a document one line at a time.
///
/// Feeding lines one by one lets the loader stream from any `BufRead`
/// without first collecting the file into memory.  The first malformed line
/// returns an error; the caller is expected to drop the parser at that point.
///
/// # Examples
///
/// ```rust
/// use cascade_ini::DocumentParser;
///
/// let mut parser = DocumentParser::new();
/// parser.feed_line("[db]").unwrap();
/// parser.feed_line("host = localhost").unwrap();
/// let store = parser.finish();
///
/// assert_eq!(store.get_string("db", "host").unwrap(), "localhost");
/// assert!(store.is_loaded());
/// ```
#[derive(Debug)]
pub struct DocumentParser {
    store: ConfigStore,
    /// Section that assignments are currently written to.
    active_section: String,
    /// Number of lines fed so far.
    line_number: usize,
}

impl DocumentParser {
    /// Creates a parser over a fresh, empty store.
    pub fn new() -> Self {
        Self::with_store(ConfigStore::new())
    }

    /// Creates a parser that writes into an existing store.
    pub fn with_store(store: ConfigStore) -> Self {
        Self {
            store,
            active_section: IMPLICIT_SECTION.to_string(),
            line_number: 0,
        }
    }

    /// Processes one physical line.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the line is structurally malformed.
    pub fn feed_line(&mut self, raw: &str) -> Result<(), ParseError> {
        self.line_number += 1;

        let line = classify(raw).map_err(|fault| {
            let line = raw.trim().to_string();
            let line_number = self.line_number;
            match fault {
                LineFault::MalformedSection => ParseError::MalformedSection { line_number, line },
                LineFault::MalformedAssignment => {
                    ParseError::MalformedAssignment { line_number, line }
                }
            }
        })?;
        trace!(line_number = self.line_number, ?line, "classified line");

        match line {
            Line::Blank | Line::Comment => {}
            Line::SectionHeader(body) => {
                self.active_section = SectionHeader::parse(body).resolve(&mut self.store);
            }
            Line::Assignment { option, value } => {
                self.store.set_string(&self.active_section, option, value);
            }
        }
        Ok(())
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// Ends the parse, marks the store as loaded and hands it back.
    pub fn finish(mut self) -> ConfigStore {
        self.store.mark_loaded(false);
        self.store
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a complete document held in memory.
///
/// No cache is involved and an empty string is accepted; use
/// [`ConfigStore::from_ini_str`] for the entry point that rejects empty input.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse_str(input: &str) -> Result<ConfigStore, ParseError> {
    let mut parser = DocumentParser::new();
    for line in input.lines() {
        parser.feed_line(line)?;
    }
    Ok(parser.finish())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::config_store::DEFAULT_SECTION;

    const SET1: &str = r#"
; comment 1
       # another comment
[begin]
a=1
b=  2
c="  3"

[  middle   ]
  key1 = value 1

# Beginning of the end
[end]
key2 = value 2
"#;

    #[test]
    fn test_parse_str_discovers_all_sections_plus_bookkeeping() {
        // Arrange / Act
        let store = parse_str(SET1).expect("well-formed document");

        // Assert
        let mut names = store.section_names();
        names.sort();
        assert_eq!(names, vec![DEFAULT_SECTION, "begin", "end", "middle"]);
    }

    #[test]
    fn test_parse_str_conforms_values() {
        let store = parse_str(SET1).unwrap();
        assert_eq!(store.get_string("begin", "a").unwrap(), "1");
        assert_eq!(store.get_string("begin", "b").unwrap(), "2");
        assert_eq!(store.get_string("begin", "c").unwrap(), "  3");
        assert_eq!(store.get_string("middle", "key1").unwrap(), "value 1");
        assert_eq!(store.get_string("end", "key2").unwrap(), "value 2");
    }

    #[test]
    fn test_parse_str_marks_store_loaded_but_not_from_cache() {
        let store = parse_str(SET1).unwrap();
        assert!(store.is_loaded());
        assert!(!store.is_from_cache());
    }

    #[test]
    fn test_assignments_before_any_header_go_to_implicit_section() {
        let store = parse_str("orphan = yes\n[named]\nk = v\n").unwrap();
        assert_eq!(store.get_string(IMPLICIT_SECTION, "orphan").unwrap(), "yes");
    }

    #[test]
    fn test_explicit_assignment_overrides_inherited_value() {
        // Arrange
        let doc = "[db]\nhost = remote\nname = prod\n[testdb : db]\nhost = localhost\n";

        // Act
        let store = parse_str(doc).unwrap();

        // Assert
        assert_eq!(store.get_string("testdb", "host").unwrap(), "localhost");
        assert_eq!(store.get_string("testdb", "name").unwrap(), "prod");
        assert_eq!(store.get_string("db", "host").unwrap(), "remote");
    }

    #[test]
    fn test_forward_reference_merges_nothing() {
        // Arrange – `child` names `parent` before it is defined.
        let doc = "[child : parent]\nown = 1\n[parent]\ninherited = 2\n";

        // Act
        let store = parse_str(doc).unwrap();

        // Assert
        assert!(store.is_option("child", "own"));
        assert!(!store.is_option("child", "inherited"));
    }

    #[test]
    fn test_reopened_section_accumulates_options() {
        let store = parse_str("[s]\na = 1\n[other]\nx = 0\n[s]\nb = 2\n").unwrap();
        assert_eq!(store.get_string("s", "a").unwrap(), "1");
        assert_eq!(store.get_string("s", "b").unwrap(), "2");
    }

    #[test]
    fn test_plain_header_without_assignments_creates_no_section() {
        let store = parse_str("[empty]\n").unwrap();
        assert!(!store.is_section("empty"));
    }

    #[test]
    fn test_unterminated_header_reports_malformed_section_with_line_number() {
        // Arrange / Act
        let err = parse_str("\n[section\nint=10").unwrap_err();

        // Assert
        assert_eq!(
            err,
            ParseError::MalformedSection {
                line_number: 2,
                line: "[section".to_string()
            }
        );
    }

    #[test]
    fn test_mismatched_bracket_reports_malformed_section() {
        let err = parse_str("\n]section]\nint=10").unwrap_err();
        assert!(matches!(err, ParseError::MalformedSection { .. }));
        assert_eq!(err.line_number(), 2);
    }

    #[test]
    fn test_line_without_equals_reports_malformed_assignment() {
        let err = parse_str("[s]\nnot an assignment\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedAssignment {
                line_number: 2,
                line: "not an assignment".to_string()
            }
        );
    }

    #[test]
    fn test_parse_error_message_names_offending_line() {
        let err = parse_str("[broken").unwrap_err();
        assert_eq!(err.to_string(), "invalid section marker on line 1: [broken");
    }

    #[test]
    fn test_lines_read_counts_every_fed_line() {
        let mut parser = DocumentParser::new();
        parser.feed_line("").unwrap();
        parser.feed_line("# c").unwrap();
        parser.feed_line("[s]").unwrap();
        assert_eq!(parser.lines_read(), 3);
    }
}
