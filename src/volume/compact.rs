//! Compaction
//!
//! Reclaims space held by tombstoned needles by rewriting the data file:
//! live records are copied into a fresh file at sequential offsets, deleted
//! records are dropped from both the file and the directory, and the old
//! file is atomically replaced.
//!
//! The original file is untouched until the final rename, so an
//! interruption at any earlier point leaves the volume openable as-is.
//! An interruption mid-swap leaves a `.old` or `.tmp` sibling behind;
//! `reconcile` resolves those deterministically on the next open.

use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{HayError, Result};
use crate::needle;

use super::volume::{Volume, BOOTSTRAP_SIZE};

/// Outcome of a compaction run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionStats {
    /// Live records copied into the new file
    pub live_records: u64,

    /// Tombstoned records dropped from the file and the directory
    pub dropped_records: u64,

    /// Bytes reclaimed (old cursor minus new cursor)
    pub reclaimed_bytes: u64,
}

impl Volume {
    /// Rewrite the data file, dropping tombstoned records
    ///
    /// Runs exclusively: the volume lock is held for the whole rewrite, so
    /// no put, delete or allocation can interleave.
    pub fn compact(&self) -> Result<CompactionStats> {
        let mut state = self.state.lock();

        let tmp = tmp_path(&self.path);
        let old = old_path(&self.path);

        let new_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp)?;

        // Copy live records at sequential offsets, ascending id order
        let mut cursor = BOOTSTRAP_SIZE;
        let mut live_records = 0u64;
        let mut dropped_records = 0u64;

        for item in self.directory.scan()? {
            let (id, record) = item?;

            if record.is_deleted() {
                // Entry and bytes are gone for good
                self.directory.delete(id)?;
                dropped_records += 1;
                continue;
            }

            let total = record.record_len();
            let mut buf = vec![0u8; total as usize];
            state.file.read_exact_at(&mut buf, record.offset)?;

            // The copied bytes move wholesale; only the embedded offset
            // field changes
            needle::patch_offset(&mut buf, cursor);
            new_file.write_all_at(&buf, cursor)?;

            let mut relocated = record;
            relocated.offset = cursor;
            self.directory.set(id, &relocated)?;

            cursor += total;
            live_records += 1;
        }

        new_file.write_all_at(&cursor.to_be_bytes(), 0)?;
        new_file.sync_all()?;

        // Swap: canonical -> .old, .tmp -> canonical, drop .old. If the
        // second rename fails, the first is reversed so the volume stays
        // servable under its original file.
        fs::rename(&self.path, &old)?;
        if let Err(swap_err) = fs::rename(&tmp, &self.path) {
            fs::rename(&old, &self.path)?;
            return Err(HayError::Compaction(format!(
                "file swap failed, volume restored: {swap_err}"
            )));
        }
        if let Err(e) = fs::remove_file(&old) {
            // Reconciled away on next open
            warn!(volume = self.id, error = %e, "could not remove pre-compaction file");
        }

        let reclaimed_bytes = state.current_offset - cursor;
        state.file = Arc::new(new_file);
        state.current_offset = cursor;

        info!(
            volume = self.id,
            live_records, dropped_records, reclaimed_bytes, "compaction finished"
        );

        Ok(CompactionStats {
            live_records,
            dropped_records,
            reclaimed_bytes,
        })
    }
}

/// Resolve leftovers of an interrupted compaction swap
///
/// Rules, applied before the canonical file is opened:
/// - canonical present: the swap either never started or completed; a
///   stray `.tmp` is removed, and a leftover `.old` is dropped when the
///   canonical bootstrap record is valid, else rolled back into place;
/// - canonical missing: the crash hit between the two renames. The `.tmp`
///   file is promoted if its bootstrap record is valid (the directory was
///   already rewritten against it), otherwise the `.old` file is restored.
pub(super) fn reconcile(path: &Path) -> Result<()> {
    let tmp = tmp_path(path);
    let old = old_path(path);

    if path.exists() {
        if tmp.exists() {
            warn!(path = %tmp.display(), "removing incomplete compaction output");
            fs::remove_file(&tmp)?;
        }
        if old.exists() {
            if bootstrap_valid(path)? {
                fs::remove_file(&old)?;
            } else {
                warn!(path = %path.display(), "invalid bootstrap record, rolling back compaction");
                fs::remove_file(path)?;
                fs::rename(&old, path)?;
            }
        }
        return Ok(());
    }

    if tmp.exists() && bootstrap_valid(&tmp)? {
        warn!(path = %path.display(), "promoting compacted file from interrupted swap");
        fs::rename(&tmp, path)?;
        if old.exists() {
            fs::remove_file(&old)?;
        }
        return Ok(());
    }

    if old.exists() {
        warn!(path = %path.display(), "restoring data file from interrupted compaction");
        fs::rename(&old, path)?;
    }
    if tmp.exists() {
        fs::remove_file(&tmp)?;
    }
    Ok(())
}

/// A bootstrap record is valid when it is fully written and points inside
/// the file
fn bootstrap_valid(path: &Path) -> Result<bool> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len < BOOTSTRAP_SIZE {
        return Ok(false);
    }

    let mut buf = [0u8; BOOTSTRAP_SIZE as usize];
    file.read_exact_at(&mut buf, 0)?;
    let cursor = u64::from_be_bytes(buf);
    Ok(cursor >= BOOTSTRAP_SIZE && cursor <= len)
}

fn tmp_path(path: &Path) -> PathBuf {
    with_suffix(path, ".tmp")
}

fn old_path(path: &Path) -> PathBuf {
    with_suffix(path, ".old")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
