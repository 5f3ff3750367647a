//! Typed getters.
//!
//! Each value type has a strict getter and a default-substituting variant:
//!
//! | Strict              | With default                     | Records misses? |
//! |---------------------|----------------------------------|-----------------|
//! | [`get_string`]      | [`get_string_or_record_default`] | yes             |
//! | [`get_int`]         | [`get_int_or_record_default`]    | yes             |
//! | [`get_bool`]        | [`get_bool_or_default`]          | **no**          |
//!
//! # Write-on-read
//!
//! The `*_or_record_default` getters mutate the store when they fall back to
//! the default, which is why they take `&mut self`:
//!
//! 1. `_default[section] = option` is written, so callers can later list which
//!    lookups were defaulted.
//! 2. If [`ConfigStore::add_default_to_section`] is set, `section[option] =
//!    default` is written too, and later strict lookups of the same key
//!    succeed.
//!
//! [`get_bool_or_default`] does neither and only needs `&self`.  Whether
//! boolean defaults should be recorded as well is an open product question,
//! so the asymmetry is kept deliberately.
//!
//! [`get_string`]: ConfigStore::get_string
//! [`get_int`]: ConfigStore::get_int
//! [`get_bool`]: ConfigStore::get_bool
//! [`get_string_or_record_default`]: ConfigStore::get_string_or_record_default
//! [`get_int_or_record_default`]: ConfigStore::get_int_or_record_default
//! [`get_bool_or_default`]: ConfigStore::get_bool_or_default

use thiserror::Error;
use tracing::debug;

use crate::store::config_store::{ConfigStore, DEFAULT_SECTION};
use crate::store::literal::{parse_bool, parse_int};

/// Errors local to a single lookup.  They never abort a parse or a load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The section does not exist.
    #[error("section '{0}' not found")]
    SectionNotFound(String),

    /// The section exists but does not contain the option.
    #[error("option '{option}' not found in section '{section}'")]
    OptionNotFound { section: String, option: String },

    /// The stored value is not a literal of the requested type.
    #[error("[{section}] {option} = '{value}' is not a valid {target}")]
    TypeConversion {
        section: String,
        option: String,
        value: String,
        target: &'static str,
    },
}

impl ConfigStore {
    /// Returns the stored value of `option` in `section`.
    ///
    /// # Errors
    ///
    /// [`LookupError::SectionNotFound`] if the section is absent,
    /// [`LookupError::OptionNotFound`] if the option is absent.
    pub fn get_string(&self, section: &str, option: &str) -> Result<&str, LookupError> {
        let options = self
            .get_section(section)
            .ok_or_else(|| LookupError::SectionNotFound(section.trim().to_string()))?;
        options.get(option).ok_or_else(|| LookupError::OptionNotFound {
            section: section.trim().to_string(),
            option: option.to_string(),
        })
    }

    /// Returns the stored value, or `default` after recording the miss.
    ///
    /// On a miss this writes `_default[section] = option` and, if
    /// [`ConfigStore::add_default_to_section`] is set, `section[option] =
    /// default`.  Never fails.
    pub fn get_string_or_record_default(
        &mut self,
        section: &str,
        option: &str,
        default: &str,
    ) -> String {
        if let Ok(value) = self.get_string(section, option) {
            return value.to_string();
        }

        debug!("[{}] {} not set; using default '{}'", section.trim(), option, default);
        self.set_string(DEFAULT_SECTION, section, option);
        if self.add_default_to_section() {
            self.set_string(section, option, default);
        }
        default.to_string()
    }

    /// Returns the stored value parsed as an integer literal.
    ///
    /// See [`crate::store::literal::parse_int`] for the accepted forms.
    ///
    /// # Errors
    ///
    /// Any [`get_string`](ConfigStore::get_string) error, or
    /// [`LookupError::TypeConversion`] if the value is not an integer.
    pub fn get_int(&self, section: &str, option: &str) -> Result<i64, LookupError> {
        let value = self.get_string(section, option)?;
        int_or_conversion_error(section, option, value)
    }

    /// Integer lookup that falls back to `default`, recording the miss.
    ///
    /// The default goes through the same path as
    /// [`get_string_or_record_default`](ConfigStore::get_string_or_record_default):
    /// it is formatted as a decimal string, recorded (and possibly written into
    /// the section), and the resulting string is parsed back.
    ///
    /// # Errors
    ///
    /// [`LookupError::TypeConversion`] if a value *is* stored but is not an
    /// integer.  A missing value is never an error.
    pub fn get_int_or_record_default(
        &mut self,
        section: &str,
        option: &str,
        default: i64,
    ) -> Result<i64, LookupError> {
        let value = self.get_string_or_record_default(section, option, &default.to_string());
        int_or_conversion_error(section, option, &value)
    }

    /// Returns the stored value parsed as a boolean literal.
    ///
    /// See [`crate::store::literal::parse_bool`] for the accepted literals.
    ///
    /// # Errors
    ///
    /// Any [`get_string`](ConfigStore::get_string) error, or
    /// [`LookupError::TypeConversion`] if the value is not a boolean.
    pub fn get_bool(&self, section: &str, option: &str) -> Result<bool, LookupError> {
        let value = self.get_string(section, option)?;
        bool_or_conversion_error(section, option, value)
    }

    /// Boolean lookup that falls back to `default` **without** recording.
    ///
    /// # Errors
    ///
    /// [`LookupError::TypeConversion`] if a value is stored but is not a
    /// boolean.  A missing value is never an error.
    pub fn get_bool_or_default(
        &self,
        section: &str,
        option: &str,
        default: bool,
    ) -> Result<bool, LookupError> {
        match self.get_string(section, option) {
            Ok(value) => bool_or_conversion_error(section, option, value),
            Err(_) => Ok(default),
        }
    }
}

fn int_or_conversion_error(section: &str, option: &str, value: &str) -> Result<i64, LookupError> {
    parse_int(value).ok_or_else(|| conversion_error(section, option, value, "integer"))
}

fn bool_or_conversion_error(
    section: &str,
    option: &str,
    value: &str,
) -> Result<bool, LookupError> {
    parse_bool(value).ok_or_else(|| conversion_error(section, option, value, "boolean"))
}

fn conversion_error(section: &str, option: &str, value: &str, target: &'static str) -> LookupError {
    LookupError::TypeConversion {
        section: section.trim().to_string(),
        option: option.to_string(),
        value: value.to_string(),
        target,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_str;

    const SET1: &str = "[begin]\na=1\nb=  2\nc=\"  3\"\n\n[end]\nkey2 = value 2\n";

    const TYPES: &str = "[types]\nbool=true\nint=101\nstring=hello\n\nbadbool=yep\nbadint=10.654\n";

    fn set1() -> ConfigStore {
        parse_str(SET1).expect("fixture parses")
    }

    // ── get_string ────────────────────────────────────────────────────────────

    #[test]
    fn test_get_string_returns_conformed_values() {
        let store = set1();
        assert_eq!(store.get_string("begin", "a"), Ok("1"));
        assert_eq!(store.get_string("begin", "b"), Ok("2"));
        assert_eq!(store.get_string("begin", "c"), Ok("  3"));
    }

    #[test]
    fn test_get_string_missing_section_is_section_not_found() {
        let store = set1();
        assert_eq!(
            store.get_string("nowhere", "a"),
            Err(LookupError::SectionNotFound("nowhere".to_string()))
        );
    }

    #[test]
    fn test_get_string_missing_option_is_option_not_found() {
        let store = set1();
        assert_eq!(
            store.get_string("begin", "zzz"),
            Err(LookupError::OptionNotFound {
                section: "begin".to_string(),
                option: "zzz".to_string()
            })
        );
    }

    #[test]
    fn test_get_string_trims_section_name() {
        let store = set1();
        assert_eq!(store.get_string("  begin ", "a"), Ok("1"));
    }

    // ── get_string_or_record_default ──────────────────────────────────────────

    #[test]
    fn test_string_default_returned_and_miss_recorded() {
        // Arrange
        let mut store = set1();

        // Act
        let value = store.get_string_or_record_default("begin", "nota", "20");

        // Assert
        assert_eq!(value, "20");
        assert_eq!(store.get_string(DEFAULT_SECTION, "begin"), Ok("nota"));
        assert!(!store.is_option("begin", "nota"), "flag is off by default");
    }

    #[test]
    fn test_string_default_not_used_when_value_present() {
        let mut store = set1();
        let value = store.get_string_or_record_default("begin", "a", "fallback");
        assert_eq!(value, "1");
        assert!(!store.is_option(DEFAULT_SECTION, "begin"));
    }

    #[test]
    fn test_string_default_with_add_to_section_writes_value() {
        // Arrange
        let mut store = set1();
        store.set_add_default_to_section(true);

        // Act
        store.get_string_or_record_default("fresh", "opt", " 'dflt' ");

        // Assert
        assert_eq!(store.get_string("fresh", "opt"), Ok("dflt"));
        assert_eq!(store.get_string(DEFAULT_SECTION, "fresh"), Ok("opt"));
    }

    #[test]
    fn test_string_default_for_missing_section_does_not_create_it_without_flag() {
        let mut store = set1();
        store.get_string_or_record_default("ghost", "k", "v");
        assert!(!store.is_section("ghost"));
    }

    #[test]
    fn test_later_miss_in_same_section_overwrites_record() {
        let mut store = set1();
        store.get_string_or_record_default("begin", "first", "1");
        store.get_string_or_record_default("begin", "second", "2");
        assert_eq!(store.get_string(DEFAULT_SECTION, "begin"), Ok("second"));
    }

    // ── get_int ───────────────────────────────────────────────────────────────

    #[test]
    fn test_get_int_parses_stored_value() {
        let store = parse_str(TYPES).unwrap();
        assert_eq!(store.get_int("types", "int"), Ok(101));
    }

    #[test]
    fn test_get_int_bad_literal_is_type_conversion() {
        let store = parse_str(TYPES).unwrap();
        assert_eq!(
            store.get_int("types", "badint"),
            Err(LookupError::TypeConversion {
                section: "types".to_string(),
                option: "badint".to_string(),
                value: "10.654".to_string(),
                target: "integer",
            })
        );
    }

    #[test]
    fn test_get_int_missing_option_propagates_lookup_error() {
        let store = parse_str(TYPES).unwrap();
        assert!(matches!(
            store.get_int("types", "missing"),
            Err(LookupError::OptionNotFound { .. })
        ));
    }

    // ── get_int_or_record_default ─────────────────────────────────────────────

    #[test]
    fn test_int_default_returned_and_recorded() {
        let mut store = set1();
        assert_eq!(store.get_int_or_record_default("begin", "nota", 22), Ok(22));
        assert_eq!(store.get_string(DEFAULT_SECTION, "begin"), Ok("nota"));
    }

    #[test]
    fn test_int_default_with_add_to_section_is_stored_as_string() {
        // Arrange
        let mut store = set1();
        store.set_add_default_to_section(true);

        // Act
        let value = store.get_int_or_record_default("end", "nota", 22);

        // Assert
        assert_eq!(value, Ok(22));
        assert_eq!(store.get_string("end", "nota"), Ok("22"));
    }

    #[test]
    fn test_int_default_negative_round_trips() {
        let mut store = set1();
        assert_eq!(store.get_int_or_record_default("begin", "neg", i64::MIN), Ok(i64::MIN));
    }

    #[test]
    fn test_int_default_with_non_integer_stored_value_is_type_conversion() {
        let mut store = parse_str(TYPES).unwrap();
        assert!(matches!(
            store.get_int_or_record_default("types", "string", 5),
            Err(LookupError::TypeConversion { .. })
        ));
        assert!(!store.is_option(DEFAULT_SECTION, "types"), "a present value is not a miss");
    }

    // ── get_bool ──────────────────────────────────────────────────────────────

    #[test]
    fn test_get_bool_parses_true() {
        let store = parse_str(TYPES).unwrap();
        assert_eq!(store.get_bool("types", "bool"), Ok(true));
    }

    #[test]
    fn test_get_bool_bad_literal_is_type_conversion() {
        let store = parse_str(TYPES).unwrap();
        let err = store.get_bool("types", "badbool").unwrap_err();
        assert!(matches!(err, LookupError::TypeConversion { target: "boolean", .. }));
        assert_eq!(err.to_string(), "[types] badbool = 'yep' is not a valid boolean");
    }

    // ── get_bool_or_default ───────────────────────────────────────────────────

    #[test]
    fn test_bool_default_returned_without_recording() {
        // Arrange
        let mut store = set1();
        store.set_add_default_to_section(true);

        // Act
        let value = store.get_bool_or_default("begin", "flag", true);

        // Assert
        assert_eq!(value, Ok(true));
        assert!(!store.is_option(DEFAULT_SECTION, "begin"));
        assert!(!store.is_option("begin", "flag"));
    }

    #[test]
    fn test_bool_default_ignored_when_value_present() {
        let store = parse_str(TYPES).unwrap();
        assert_eq!(store.get_bool_or_default("types", "bool", false), Ok(true));
    }

    #[test]
    fn test_bool_default_with_bad_stored_value_is_type_conversion() {
        let store = parse_str(TYPES).unwrap();
        assert!(store.get_bool_or_default("types", "badbool", true).is_err());
    }
}
