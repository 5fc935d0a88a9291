//! Redb-backed directory
//!
//! Reference implementation of the `Directory` trait over redb, an embedded
//! ordered B-tree store. One table per directory; redb's u64 key ordering
//! gives the ascending-id scans compaction relies on.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{HayError, Result};
use crate::needle::{self, Needle};

use super::{Directory, DirectoryScan};

/// Needle records: key = object id, value = codec-encoded needle bytes
const NEEDLE_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("needles");

/// Directory backed by a redb database file
pub struct RedbDirectory {
    db: Database,
}

impl RedbDirectory {
    /// Open or create a directory database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(HayError::backend)?;

        // Ensure the table exists so later read transactions can open it
        let txn = db.begin_write().map_err(HayError::backend)?;
        {
            txn.open_table(NEEDLE_TABLE).map_err(HayError::backend)?;
        }
        txn.commit().map_err(HayError::backend)?;

        Ok(Self { db })
    }
}

impl Directory for RedbDirectory {
    fn get(&self, id: u64) -> Result<Needle> {
        let txn = self.db.begin_read().map_err(HayError::backend)?;
        let table = txn.open_table(NEEDLE_TABLE).map_err(HayError::backend)?;

        match table.get(id).map_err(HayError::backend)? {
            Some(raw) => needle::decode(raw.value()),
            None => Err(HayError::NotFound(id)),
        }
    }

    fn set(&self, id: u64, needle: &Needle) -> Result<()> {
        let encoded = needle::encode(needle)?;

        let txn = self.db.begin_write().map_err(HayError::backend)?;
        {
            let mut table = txn.open_table(NEEDLE_TABLE).map_err(HayError::backend)?;
            table
                .insert(id, encoded.as_slice())
                .map_err(HayError::backend)?;
        }
        txn.commit().map_err(HayError::backend)?;
        Ok(())
    }

    fn has(&self, id: u64) -> Result<bool> {
        let txn = self.db.begin_read().map_err(HayError::backend)?;
        let table = txn.open_table(NEEDLE_TABLE).map_err(HayError::backend)?;
        Ok(table.get(id).map_err(HayError::backend)?.is_some())
    }

    fn delete(&self, id: u64) -> Result<()> {
        let txn = self.db.begin_write().map_err(HayError::backend)?;
        {
            let mut table = txn.open_table(NEEDLE_TABLE).map_err(HayError::backend)?;
            table.remove(id).map_err(HayError::backend)?;
        }
        txn.commit().map_err(HayError::backend)?;
        Ok(())
    }

    fn scan(&self) -> Result<DirectoryScan> {
        // Materialize the raw entries inside one read transaction; the scan
        // then observes a consistent snapshot even if the directory mutates
        // while the caller iterates.
        let txn = self.db.begin_read().map_err(HayError::backend)?;
        let table = txn.open_table(NEEDLE_TABLE).map_err(HayError::backend)?;

        let mut entries: Vec<(u64, Vec<u8>)> = Vec::new();
        for item in table.iter().map_err(HayError::backend)? {
            let (key, value) = item.map_err(HayError::backend)?;
            entries.push((key.value(), value.value().to_vec()));
        }

        Ok(Box::new(
            entries
                .into_iter()
                .map(|(id, raw)| needle::decode(&raw).map(|n| (id, n))),
        ))
    }
}
