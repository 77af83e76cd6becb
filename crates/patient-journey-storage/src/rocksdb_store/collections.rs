//! Generation-swapped collection reads and writes.

use rocksdb::{Direction, IteratorMode, WriteBatch};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use patient_journey_core::{Collection, GenerationMeta};

use crate::column_families::{collection_cf, CF_GENERATIONS};
use crate::error::{StorageError, StorageResult};
use crate::schema::{generation_pointer_key, generation_start, parse_row_key, row_key, stale_range};

use super::RocksDbJourneyStore;

impl RocksDbJourneyStore {
    /// Active generation of `collection`, if it was ever written.
    pub fn read_generation(&self, collection: Collection) -> StorageResult<Option<GenerationMeta>> {
        let cf = self.get_cf(CF_GENERATIONS)?;
        let key = generation_pointer_key(collection);

        match self.db.get_cf(cf, key) {
            Ok(Some(data)) => Ok(Some(Self::deserialize_with_version(
                &data,
                CF_GENERATIONS,
                collection.as_str(),
            )?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::rocksdb_op("get", CF_GENERATIONS, e)),
        }
    }

    /// Replace every row of `collection`.
    ///
    /// 1. Rows of the new generation and the repointed generation entry are
    ///    written in one atomic `WriteBatch`
    /// 2. Older generations are range-deleted
    ///
    /// A failure in step 1 leaves the previous generation active. A failure
    /// in step 2 only leaves unreachable rows and is logged, not returned.
    pub(crate) fn replace_collection<T: Serialize>(
        &self,
        collection: Collection,
        run_id: Uuid,
        rows: &[T],
    ) -> StorageResult<GenerationMeta> {
        let _guard = self.write_lock.lock();

        let cf_name = collection_cf(collection);
        let cf = self.get_cf(cf_name)?;
        let cf_generations = self.get_cf(CF_GENERATIONS)?;

        let previous = self.read_generation(collection)?;
        let meta = GenerationMeta::next(collection, previous.as_ref(), run_id, rows.len());

        let mut batch = WriteBatch::default();
        for (index, row) in rows.iter().enumerate() {
            let value = Self::serialize_with_version(row)?;
            batch.put_cf(cf, row_key(meta.generation, index as u64), value);
        }
        batch.put_cf(
            cf_generations,
            generation_pointer_key(collection),
            Self::serialize_with_version(&meta)?,
        );

        self.db
            .write(batch)
            .map_err(|e| StorageError::rocksdb_op("write_batch", cf_name, e))?;

        let (from, to) = stale_range(meta.generation);
        if let Err(e) = self.db.delete_range_cf(cf, from, to) {
            warn!(
                collection = %collection,
                generation = meta.generation,
                error = %e,
                "failed to purge stale generations"
            );
        }

        debug!(
            collection = %collection,
            generation = meta.generation,
            rows = rows.len(),
            "collection replaced"
        );
        Ok(meta)
    }

    /// Load every row of the active generation of `collection`.
    ///
    /// # Errors
    ///
    /// - `StorageError::RowCountMismatch` if the generation is incomplete
    /// - `StorageError::Deserialization` / `VersionMismatch` on bad rows
    pub(crate) fn load_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> StorageResult<Vec<T>> {
        let Some(meta) = self.read_generation(collection)? else {
            return Ok(Vec::new());
        };

        let cf_name = collection_cf(collection);
        let cf = self.get_cf(cf_name)?;
        let start = generation_start(meta.generation);
        let mut rows = Vec::with_capacity(meta.record_count);

        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&start, Direction::Forward));
        for item in iter {
            let (key, value) =
                item.map_err(|e| StorageError::rocksdb_op("iterate", cf_name, e))?;
            let (generation, index) = parse_row_key(&key, cf_name)?;
            if generation != meta.generation {
                break;
            }
            rows.push(Self::deserialize_with_version(
                &value,
                cf_name,
                &format!("{}:{}", generation, index),
            )?);
        }

        if rows.len() != meta.record_count {
            return Err(StorageError::RowCountMismatch {
                cf: cf_name,
                generation: meta.generation,
                expected: meta.record_count,
                actual: rows.len(),
            });
        }

        debug!(collection = %collection, rows = rows.len(), "collection loaded");
        Ok(rows)
    }

    /// Number of stored rows in `collection` across all generations,
    /// including any not yet purged.
    pub fn raw_row_count(&self, collection: Collection) -> StorageResult<usize> {
        let cf_name = collection_cf(collection);
        let cf = self.get_cf(cf_name)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item.map_err(|e| StorageError::rocksdb_op("iterate", cf_name, e))?;
            count += 1;
        }
        Ok(count)
    }
}

