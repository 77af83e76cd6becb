//! RocksDB-backed [`PipelineStore`](patient_journey_core::traits::PipelineStore).
//!
//! # Thread Safety
//!
//! Reads go straight to RocksDB. Replaces are serialized by a write lock so
//! two replaces of the same collection cannot both claim the next generation.
//! Cross-process exclusion comes from RocksDB's own LOCK file: a second
//! process opening the same path fails with `StorageError::OpenFailed`.

mod collections;
mod trait_impl;

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rocksdb::{Cache, ColumnFamily, Options, DB};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info};

use patient_journey_core::config::{RetryPolicy, StoreSettings};
use patient_journey_core::pipeline::with_retry;
use patient_journey_core::PipelineResult;

use crate::column_families::{all_cf_names, get_cf_descriptors};
use crate::error::{StorageError, StorageResult};

/// Serialization version for stored values.
///
/// Bump this when a stored struct's layout changes.
const STORAGE_VERSION: u8 = 1;

/// Configuration for [`RocksDbJourneyStore`].
#[derive(Debug, Clone)]
pub struct RocksDbStoreConfig {
    /// Block cache size in bytes (default: 64MB).
    pub block_cache_size: usize,
    /// Maximum number of open files (default: 500).
    pub max_open_files: i32,
    /// Create database if it doesn't exist (default: true).
    pub create_if_missing: bool,
}

impl Default for RocksDbStoreConfig {
    fn default() -> Self {
        Self {
            block_cache_size: 64 * 1024 * 1024,
            max_open_files: 500,
            create_if_missing: true,
        }
    }
}

impl RocksDbStoreConfig {
    /// Derive from the pipeline's `[store]` section.
    pub fn from_settings(settings: &StoreSettings) -> Self {
        Self {
            block_cache_size: settings.block_cache_mb * 1024 * 1024,
            ..Self::default()
        }
    }
}

/// RocksDB storage for every pipeline collection.
///
/// # Example
///
/// ```ignore
/// use patient_journey_storage::RocksDbJourneyStore;
/// use tempfile::TempDir;
///
/// let tmp = TempDir::new().unwrap();
/// let store = RocksDbJourneyStore::open(tmp.path()).unwrap();
/// store.health_check().unwrap();
/// ```
pub struct RocksDbJourneyStore {
    db: DB,
    /// Shared block cache; must outlive `db`.
    #[allow(dead_code)]
    cache: Cache,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RocksDbJourneyStore {
    /// Open a store with default configuration, creating it if missing.
    ///
    /// # Errors
    ///
    /// - `StorageError::OpenFailed` - path invalid, permissions denied, or DB locked
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::open_with_config(path, RocksDbStoreConfig::default())
    }

    /// Open a store with custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: RocksDbStoreConfig,
    ) -> StorageResult<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let path_str = path_buf.to_string_lossy().to_string();

        info!(
            "Opening RocksDbJourneyStore at '{}' with cache_size={}MB",
            path_str,
            config.block_cache_size / (1024 * 1024)
        );

        let cache = Cache::new_lru_cache(config.block_cache_size);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(config.create_if_missing);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_open_files(config.max_open_files);

        let cf_descriptors = get_cf_descriptors(&cache);
        debug!(
            "Opening database with {} column families",
            cf_descriptors.len()
        );

        let db = DB::open_cf_descriptors(&db_opts, &path_str, cf_descriptors).map_err(|e| {
            error!("Failed to open RocksDB at '{}': {}", path_str, e);
            StorageError::OpenFailed {
                path: path_str.clone(),
                message: e.to_string(),
            }
        })?;

        info!("Opened RocksDbJourneyStore at '{}'", path_str);

        Ok(Self {
            db,
            cache,
            path: path_buf,
            write_lock: Mutex::new(()),
        })
    }

    /// Database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify every column family is present.
    pub fn health_check(&self) -> StorageResult<()> {
        for name in all_cf_names() {
            self.get_cf(name)?;
        }
        Ok(())
    }

    /// Flush memtables of every column family to disk.
    pub fn flush_all(&self) -> StorageResult<()> {
        for name in all_cf_names() {
            let cf = self.get_cf(name)?;
            self.db
                .flush_cf(cf)
                .map_err(|e| StorageError::rocksdb_op("flush", name, e))?;
        }
        debug!("Flushed all column families");
        Ok(())
    }

    fn get_cf(&self, name: &str) -> StorageResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound {
                name: name.to_string(),
            })
    }

    /// Serialize a value with version prefix.
    fn serialize_with_version<T: Serialize>(value: &T) -> StorageResult<Vec<u8>> {
        let mut result = vec![STORAGE_VERSION];
        let encoded = bincode::serialize(value).map_err(|e| StorageError::Serialization {
            type_name: std::any::type_name::<T>(),
            message: e.to_string(),
        })?;
        result.extend(encoded);
        Ok(result)
    }

    /// Deserialize a value with version check.
    fn deserialize_with_version<T: DeserializeOwned>(
        data: &[u8],
        cf: &'static str,
        key: &str,
    ) -> StorageResult<T> {
        let Some((&version, payload)) = data.split_first() else {
            return Err(StorageError::Deserialization {
                cf,
                key: key.to_string(),
                message: "Empty data".to_string(),
            });
        };

        if version != STORAGE_VERSION {
            return Err(StorageError::VersionMismatch {
                cf,
                expected: STORAGE_VERSION,
                actual: version,
            });
        }

        bincode::deserialize(payload).map_err(|e| StorageError::Deserialization {
            cf,
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

/// Open the store described by `settings`, retrying per `policy`.
///
/// A store held by another process, or an unreachable path, fails with
/// `PipelineError::Connectivity` once attempts are exhausted.
pub fn open_with_retry(
    settings: &StoreSettings,
    policy: &RetryPolicy,
) -> PipelineResult<RocksDbJourneyStore> {
    with_retry(policy, "open_store", || {
        RocksDbJourneyStore::open_with_config(
            &settings.path,
            RocksDbStoreConfig::from_settings(settings),
        )
        .map_err(Into::into)
    })
}
