//! Integer and boolean literal parsing.
//!
//! # Integer literals
//!
//! Integers are signed 64-bit values written in any of the usual bases,
//! selected by prefix:
//!
//! | Form              | Base | Example      |
//! |-------------------|------|--------------|
//! | `0x` / `0X`       | 16   | `0xFF`       |
//! | `0o` / `0O`       | 8    | `0o17`       |
//! | `0b` / `0B`       | 2    | `0b1010`     |
//! | leading `0`       | 8    | `017`        |
//! | anything else     | 10   | `-42`        |
//!
//! An optional `+` or `-` sign comes first.  Underscores may separate digits
//! (`1_000_000`, `0x_FF`) but may not lead, trail, or repeat.
//!
//! # Boolean literals
//!
//! Exactly `1`, `t`, `T`, `TRUE`, `true`, `True` and `0`, `f`, `F`,
//! `FALSE`, `false`, `False`.  Words such as `yes`/`no` or `on`/`off` are
//! rejected.

/// Parses a base-prefixed signed 64-bit integer literal.
///
/// Returns `None` for malformed literals and for values outside `i64`.
///
/// # Examples
///
/// ```rust
/// use cascade_ini::store::literal::parse_int;
///
/// assert_eq!(parse_int("101"), Some(101));
/// assert_eq!(parse_int("-0x10"), Some(-16));
/// assert_eq!(parse_int("0b1_0"), Some(2));
/// assert_eq!(parse_int("10.654"), None);
/// ```
pub fn parse_int(literal: &str) -> Option<i64> {
    let (negative, unsigned) = match literal.as_bytes().first()? {
        b'-' => (true, &literal[1..]),
        b'+' => (false, &literal[1..]),
        _ => (false, literal),
    };
    if !underscores_ok(unsigned) {
        return None;
    }

    let (radix, digits) = split_radix(unsigned);
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    // `from_str_radix` would accept its own sign; a second sign is malformed.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = u64::from_str_radix(&digits, radix).ok()?;
    let signed = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    i64::try_from(signed).ok()
}

/// Parses a boolean literal.
///
/// # Examples
///
/// ```rust
/// use cascade_ini::store::literal::parse_bool;
///
/// assert_eq!(parse_bool("True"), Some(true));
/// assert_eq!(parse_bool("0"), Some(false));
/// assert_eq!(parse_bool("yes"), None);
/// ```
pub fn parse_bool(literal: &str) -> Option<bool> {
    match literal {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Selects the radix from the prefix and returns the remaining digits.
fn split_radix(unsigned: &str) -> (u32, &str) {
    let bytes = unsigned.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return (10, unsigned);
    }
    match bytes[1].to_ascii_lowercase() {
        b'x' => (16, &unsigned[2..]),
        b'o' => (8, &unsigned[2..]),
        b'b' => (2, &unsigned[2..]),
        _ => (8, &unsigned[1..]),
    }
}

/// Checks digit-separator placement.
///
/// An underscore must sit between two digits, or between a base prefix and
/// a digit.
fn underscores_ok(unsigned: &str) -> bool {
    #[derive(PartialEq)]
    enum Seen {
        Start,
        Digit,
        Underscore,
        Other,
    }

    let bytes = unsigned.as_bytes();
    let mut seen = Seen::Start;
    let mut rest = bytes;
    let mut hex = false;

    if bytes.len() >= 2
        && bytes[0] == b'0'
        && matches!(bytes[1].to_ascii_lowercase(), b'b' | b'o' | b'x')
    {
        // The prefix counts as a digit so that `0x_1` is accepted.
        seen = Seen::Digit;
        hex = bytes[1].to_ascii_lowercase() == b'x';
        rest = &bytes[2..];
    }

    for &b in rest {
        if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            seen = Seen::Digit;
        } else if b == b'_' {
            if seen != Seen::Digit {
                return false;
            }
            seen = Seen::Underscore;
        } else {
            if seen == Seen::Underscore {
                return false;
            }
            seen = Seen::Other;
        }
    }
    seen != Seen::Underscore
}

// ── Tests ─────────────────────────────────────────────────────────────────────
