//! Key format functions.
//!
//! Row keys are fixed 16 bytes: generation (u64 BE) followed by the row index
//! (u64 BE). Big-endian keeps each generation contiguous and ordered under
//! RocksDB's bytewise comparator, so a generation is one range scan and
//! older generations are one range delete.

use patient_journey_core::Collection;

use crate::error::{StorageError, StorageResult};

/// Length of a row key.
pub const ROW_KEY_LEN: usize = 16;

/// Create the key for row `index` of `generation`.
#[inline]
pub fn row_key(generation: u64, index: u64) -> [u8; ROW_KEY_LEN] {
    let mut key = [0u8; ROW_KEY_LEN];
    key[..8].copy_from_slice(&generation.to_be_bytes());
    key[8..].copy_from_slice(&index.to_be_bytes());
    key
}

/// Parse a row key back into `(generation, index)`.
///
/// # Errors
///
/// `StorageError::MalformedKey` if `key` is not exactly 16 bytes.
pub fn parse_row_key(key: &[u8], cf: &'static str) -> StorageResult<(u64, u64)> {
    let Ok(bytes) = <[u8; ROW_KEY_LEN]>::try_from(key) else {
        return Err(StorageError::MalformedKey {
            cf,
            expected: ROW_KEY_LEN,
            actual: key.len(),
        });
    };
    let mut generation = [0u8; 8];
    let mut index = [0u8; 8];
    generation.copy_from_slice(&bytes[..8]);
    index.copy_from_slice(&bytes[8..]);
    Ok((u64::from_be_bytes(generation), u64::from_be_bytes(index)))
}

/// First key of `generation`.
#[inline]
pub fn generation_start(generation: u64) -> [u8; ROW_KEY_LEN] {
    row_key(generation, 0)
}

/// Half-open range covering every generation older than `generation`.
#[inline]
pub fn stale_range(generation: u64) -> ([u8; ROW_KEY_LEN], [u8; ROW_KEY_LEN]) {
    (row_key(0, 0), row_key(generation, 0))
}

/// Key of a collection's entry in the generations CF.
#[inline]
pub fn generation_pointer_key(collection: Collection) -> &'static [u8] {
    collection.as_str().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_key_roundtrip() {
        let key = row_key(7, 123_456);
        assert_eq!(parse_row_key(&key, "patients").unwrap(), (7, 123_456));
    }

    #[test]
    fn test_row_keys_sort_by_generation_then_index() {
        let mut keys = vec![row_key(2, 0), row_key(1, 300), row_key(1, 2), row_key(10, 1)];
        keys.sort();

        assert_eq!(
            keys,
            vec![row_key(1, 2), row_key(1, 300), row_key(2, 0), row_key(10, 1)]
        );
        println!("[VERIFIED] Big-endian keys keep generations contiguous");
    }

    #[test]
    fn test_stale_range_excludes_current_generation() {
        let (start, end) = stale_range(5);
        assert!(row_key(4, u64::MAX) < end);
        assert!(row_key(5, 0) >= end);
        assert!(start <= row_key(1, 0));
    }

    #[test]
    fn test_short_key_is_malformed() {
        let err = parse_row_key(&[1, 2, 3], "feature_vectors").unwrap_err();
        assert!(matches!(
            err,
            StorageError::MalformedKey {
                expected: 16,
                actual: 3,
                ..
            }
        ));
    }
}
