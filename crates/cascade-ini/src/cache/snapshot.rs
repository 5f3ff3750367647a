//! Binary snapshot format for cached stores.
//!
//! Layout:
//! ```text
//! [magic:4 = "CINI"][format_version:1][body:N]
//! ```
//! The body is the store's full section map (including `_default`) encoded
//! with `bincode`.  Flags and paths are not part of the snapshot; they belong
//! to whoever loads it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cache::CacheError;
use crate::store::config_store::ConfigStore;
use crate::store::section::Section;

/// File signature of a snapshot.
pub const CACHE_MAGIC: [u8; 4] = *b"CINI";

/// Current snapshot format version.
pub const CACHE_FORMAT_VERSION: u8 = 1;

/// Size of the magic plus version prefix.
pub const HEADER_SIZE: usize = 5;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    sections: &'a HashMap<String, Section>,
}

#[derive(Deserialize)]
struct Snapshot {
    sections: HashMap<String, Section>,
}

/// Encodes every section of `store` into a framed snapshot.
///
/// # Errors
///
/// Returns [`CacheError::Encode`] if serialisation fails.
///
/// # Examples
///
/// ```rust
/// use cascade_ini::cache::snapshot::{decode_snapshot, encode_snapshot};
/// use cascade_ini::ConfigStore;
///
/// let store = ConfigStore::from_ini_str("[s]\nk = v\n").unwrap();
/// let bytes = encode_snapshot(&store).unwrap();
/// let restored = decode_snapshot(&bytes).unwrap();
/// assert_eq!(restored.get_string("s", "k").unwrap(), "v");
/// assert!(restored.is_from_cache());
/// ```
pub fn encode_snapshot(store: &ConfigStore) -> Result<Vec<u8>, CacheError> {
    let body = bincode::serialize(&SnapshotRef {
        sections: store.sections_map(),
    })
    .map_err(CacheError::Encode)?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
    buf.extend_from_slice(&CACHE_MAGIC);
    buf.push(CACHE_FORMAT_VERSION);
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Decodes a framed snapshot into a store marked as loaded from cache.
///
/// # Errors
///
/// [`CacheError::BadMagic`] if the signature is missing,
/// [`CacheError::UnsupportedVersion`] for an unknown format version, and
/// [`CacheError::Decode`] if the body is corrupt.
pub fn decode_snapshot(bytes: &[u8]) -> Result<ConfigStore, CacheError> {
    if bytes.len() < HEADER_SIZE || bytes[..4] != CACHE_MAGIC {
        return Err(CacheError::BadMagic);
    }

    let version = bytes[4];
    if version != CACHE_FORMAT_VERSION {
        return Err(CacheError::UnsupportedVersion(version));
    }

    let snapshot: Snapshot =
        bincode::deserialize(&bytes[HEADER_SIZE..]).map_err(CacheError::Decode)?;
    let mut store = ConfigStore::from_sections(snapshot.sections);
    store.mark_loaded(true);
    Ok(store)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::config_store::DEFAULT_SECTION;
    use crate::syntax::parser::parse_str;

    #[test]
    fn test_encoded_snapshot_starts_with_header() {
        let bytes = encode_snapshot(&ConfigStore::new()).unwrap();
        assert_eq!(&bytes[..4], b"CINI");
        assert_eq!(bytes[4], CACHE_FORMAT_VERSION);
    }

    #[test]
    fn test_snapshot_preserves_every_section_including_bookkeeping() {
        // Arrange
        let mut store = parse_str("[a]\nx = 1\n[b : a]\ny = \" 2\"\n").unwrap();
        store.get_string_or_record_default("a", "missing", "d");

        // Act
        let restored = decode_snapshot(&encode_snapshot(&store).unwrap()).unwrap();

        // Assert
        assert_eq!(restored.section_count(), store.section_count());
        assert_eq!(restored.get_string("b", "x").unwrap(), "1");
        assert_eq!(restored.get_string("b", "y").unwrap(), " 2");
        assert_eq!(restored.get_string(DEFAULT_SECTION, "a").unwrap(), "missing");
    }

    #[test]
    fn test_decoded_store_is_loaded_from_cache() {
        let restored = decode_snapshot(&encode_snapshot(&ConfigStore::new()).unwrap()).unwrap();
        assert!(restored.is_loaded());
        assert!(restored.is_from_cache());
    }

    #[test]
    fn test_decode_rejects_short_or_foreign_input() {
        assert!(matches!(decode_snapshot(b""), Err(CacheError::BadMagic)));
        assert!(matches!(decode_snapshot(b"CIN"), Err(CacheError::BadMagic)));
        assert!(matches!(decode_snapshot(b"GOB!\x01rest"), Err(CacheError::BadMagic)));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut bytes = encode_snapshot(&ConfigStore::new()).unwrap();
        bytes[4] = 0xEE;
        assert!(matches!(
            decode_snapshot(&bytes),
            Err(CacheError::UnsupportedVersion(0xEE))
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_body() {
        let bytes = encode_snapshot(&parse_str("[s]\nk = value\n").unwrap()).unwrap();
        let truncated = &bytes[..bytes.len() - 3];
        assert!(matches!(decode_snapshot(truncated), Err(CacheError::Decode(_))));
    }
}
