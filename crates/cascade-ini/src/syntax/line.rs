//! Line classification and value conforming.
//!
//! Every physical line of a document is trimmed and then falls into exactly
//! one of four categories:
//!
//! | First character       | Category        | Example             |
//! |-----------------------|-----------------|---------------------|
//! | *(line is empty)*     | blank           |                     |
//! | `#` or `;`            | comment         | `; a comment`       |
//! | `[`                   | section header  | `[child : parent]`  |
//! | anything else         | assignment      | `key = "value"`     |
//!
//! A header must end with `]`, and an assignment must contain `=`.  Lines that
//! break either rule produce a [`LineFault`], which the document parser turns
//! into a positioned [`crate::ParseError`].

/// Quote characters stripped by [`conform`].
const QUOTES: [u8; 2] = [b'"', b'\''];

/// One classified line.  Borrowed slices point into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty after trimming.
    Blank,
    /// Starts with `#` or `;`.
    Comment,
    /// `[...]`; holds the text between the brackets, not yet trimmed.
    SectionHeader(&'a str),
    /// `option = value`, both sides trimmed.  Quotes are still in place;
    /// they are stripped by [`conform`] when the entry is stored.
    Assignment { option: &'a str, value: &'a str },
}

/// Why a line could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFault {
    /// A header without its closing `]`, or a stray leading `]`.
    MalformedSection,
    /// A non-comment, non-header line without `=`.
    MalformedAssignment,
}

/// Classifies a single raw line.
///
/// # Errors
///
/// Returns [`LineFault::MalformedSection`] when a line opens with `[` but does
/// not close with `]` (or opens with `]`), and
/// [`LineFault::MalformedAssignment`] when an assignment line has no `=`.
///
/// # Examples
///
/// ```rust
/// use cascade_ini::syntax::{classify, Line};
///
/// assert_eq!(classify("  # note"), Ok(Line::Comment));
/// assert_eq!(classify("[ db ]"), Ok(Line::SectionHeader(" db ")));
/// assert_eq!(
///     classify("host = 'localhost'"),
///     Ok(Line::Assignment { option: "host", value: "'localhost'" })
/// );
/// ```
pub fn classify(raw: &str) -> Result<Line<'_>, LineFault> {
    let line = raw.trim();

    if line.is_empty() {
        return Ok(Line::Blank);
    }
    if line.starts_with('#') || line.starts_with(';') {
        return Ok(Line::Comment);
    }
    if line.starts_with('[') {
        if !line.ends_with(']') {
            return Err(LineFault::MalformedSection);
        }
        // Both brackets are single-byte, so the slice is on char boundaries.
        return Ok(Line::SectionHeader(&line[1..line.len() - 1]));
    }
    if line.starts_with(']') {
        return Err(LineFault::MalformedSection);
    }

    match line.split_once('=') {
        Some((option, value)) => Ok(Line::Assignment {
            option: option.trim(),
            value: value.trim(),
        }),
        None => Err(LineFault::MalformedAssignment),
    }
}

/// Normalises an option name or value.
///
/// Surrounding whitespace is trimmed, then a single layer of matching quotes
/// (`"..."` or `'...'`) is removed.  Whitespace inside the quotes survives,
/// and only one layer is stripped: `""v""` becomes `"v"`.
///
/// # Examples
///
/// ```rust
/// use cascade_ini::syntax::conform;
///
/// assert_eq!(conform("  plain  "), "plain");
/// assert_eq!(conform(r#""  3""#), "  3");
/// assert_eq!(conform(r#"""v"""#), r#""v""#);
/// assert_eq!(conform(r#"'mixed""#), r#"'mixed""#);
/// ```
pub fn conform(text: &str) -> &str {
    let text = text.trim();
    let bytes = text.as_bytes();

    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last))
            if bytes.len() >= 2 && QUOTES.contains(first) && first == last =>
        {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
