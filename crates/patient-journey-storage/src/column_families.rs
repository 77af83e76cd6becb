//! RocksDB column family definitions.
//!
//! # Column Families (10 total)
//! | Name | Key Format | Value |
//! |------|------------|-------|
//! | patients .. observations | generation:index (16 bytes) | RawEvent |
//! | composite_records | generation:index (16 bytes) | CompositePatientRecord |
//! | feature_vectors | generation:index (16 bytes) | FeatureVector |
//! | cluster_assignments | generation:index (16 bytes) | ClusterAssignment |
//! | generations | collection name | GenerationMeta |
//!
//! Collection CFs reuse [`Collection::as_str`] as their name.

use patient_journey_core::Collection;
use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, DBCompressionType, Options};

/// Active generation pointer per collection.
/// Key: collection name bytes
/// Value: GenerationMeta serialized via bincode
pub const CF_GENERATIONS: &str = "generations";

/// Column family holding the rows of `collection`.
#[inline]
pub fn collection_cf(collection: Collection) -> &'static str {
    collection.as_str()
}

/// Every column family name: one per collection plus `generations`.
pub fn all_cf_names() -> Vec<&'static str> {
    Collection::ALL
        .iter()
        .map(|c| collection_cf(*c))
        .chain(std::iter::once(CF_GENERATIONS))
        .collect()
}

/// Options for collection row CFs (bulk sequential writes and scans).
///
/// - LZ4 compression: rows are field maps with repetitive keys
/// - No bloom filter: reads are range scans, not point lookups
pub fn collection_cf_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(DBCompressionType::Lz4);
    opts.create_if_missing(true);
    opts
}

/// Options for the small generations CF (point lookups only).
pub fn generations_cf_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(DBCompressionType::None);
    opts.optimize_for_point_lookup(16);
    opts.create_if_missing(true);
    opts
}

/// Descriptors for every column family, sharing one block cache.
pub fn get_cf_descriptors(cache: &Cache) -> Vec<ColumnFamilyDescriptor> {
    Collection::ALL
        .iter()
        .map(|c| ColumnFamilyDescriptor::new(collection_cf(*c), collection_cf_options(cache)))
        .chain(std::iter::once(ColumnFamilyDescriptor::new(
            CF_GENERATIONS,
            generations_cf_options(cache),
        )))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_cf_names_unique_and_complete() {
        let names = all_cf_names();
        let unique: HashSet<_> = names.iter().collect();

        assert_eq!(names.len(), Collection::ALL.len() + 1);
        assert_eq!(unique.len(), names.len());
        assert!(names.contains(&CF_GENERATIONS));
        assert!(names.contains(&"feature_vectors"));

        println!("[VERIFIED] {} unique column families", names.len());
    }

    #[test]
    fn test_descriptor_count_matches_names() {
        let cache = Cache::new_lru_cache(1024 * 1024);
        assert_eq!(get_cf_descriptors(&cache).len(), all_cf_names().len());
    }
}
