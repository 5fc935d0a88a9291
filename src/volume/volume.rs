//! Volume implementation
//!
//! Owns the open data file handle and the mutation lock. Every mutating
//! operation (allocate, put, delete, compact) and every bootstrap-cursor
//! read/write runs under one mutex; body reads only clone the shared file
//! handle and run lock-free.

use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::VolumeConfig;
use crate::directory::{Directory, RedbDirectory};
use crate::error::{HayError, Result};
use crate::id::{ClockIdGenerator, IdGenerator};
use crate::needle::{self, Needle, NeedleFlag, MAX_EXT_LEN};

use super::compact::reconcile;
use super::cursor::{BodyReader, BodyWriter};

/// Size of the bootstrap record at file position 0, and therefore the
/// minimum header offset of any needle
pub const BOOTSTRAP_SIZE: u64 = 8;

/// Mutable state guarded by the volume lock
pub(super) struct VolumeState {
    /// Open handle to the data file; swapped by compaction. Body cursors
    /// clone the Arc and outlive a swap safely.
    pub(super) file: Arc<File>,

    /// Monotonically non-decreasing write cursor; always equals the 8-byte
    /// bootstrap record persisted at file position 0
    pub(super) current_offset: u64,
}

/// One append-only data file plus its directory index
pub struct Volume {
    pub(super) id: u64,
    pub(super) path: PathBuf,
    pub(super) capacity: u64,
    pub(super) directory: Arc<dyn Directory>,
    pub(super) ids: Arc<dyn IdGenerator>,
    pub(super) state: Mutex<VolumeState>,
}

impl Volume {
    /// Open or create a volume with the reference directory backend and the
    /// default id generator
    pub fn open(id: u64, config: VolumeConfig) -> Result<Self> {
        Self::open_with_ids(id, config, Arc::new(ClockIdGenerator::default()))
    }

    /// Open or create a volume with the reference directory backend and a
    /// shared id generator (used by `Store` so ids stay unique across
    /// volumes)
    pub fn open_with_ids(
        id: u64,
        config: VolumeConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        fs::create_dir_all(&config.dir)?;
        let index_path = config.dir.join(format!("{:06}.index", id));
        let directory = Arc::new(RedbDirectory::open(&index_path)?);
        Self::open_with(id, config, directory, ids)
    }

    /// Open or create a volume with explicit collaborators
    pub fn open_with(
        id: u64,
        config: VolumeConfig,
        directory: Arc<dyn Directory>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        fs::create_dir_all(&config.dir)?;
        let path = config.dir.join(format!("{:06}.data", id));

        // Clean up leftovers from an interrupted compaction swap before
        // touching the canonical file
        reconcile(&path)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;

        let current_offset = read_bootstrap(&file)?.unwrap_or(0).max(BOOTSTRAP_SIZE);
        file.write_all_at(&current_offset.to_be_bytes(), 0)?;

        debug!(volume = id, offset = current_offset, "opened volume");

        Ok(Self {
            id,
            path,
            capacity: config.capacity,
            directory,
            ids,
            state: Mutex::new(VolumeState {
                file: Arc::new(file),
                current_offset,
            }),
        })
    }

    /// Write a new needle with a caller-assigned id
    pub fn put(&self, id: u64, body: &[u8], filename: &str) -> Result<Needle> {
        let ext = extension_of(filename);
        if ext.len() > MAX_EXT_LEN {
            return Err(HayError::ExtensionTooLong(ext.len()));
        }

        let mut state = self.state.lock();

        let offset = self.allocate(&mut state, body.len() as u64, ext.len() as u64)?;

        let now = unix_now();
        let needle = Needle {
            id,
            size: body.len() as u64,
            offset,
            flag: NeedleFlag::Normal,
            ext: ext.to_string(),
            checksum: needle::checksum(body),
            created_at: now,
            updated_at: now,
        };

        let header = needle::encode(&needle)?;
        state.file.write_all_at(&header, offset)?;

        let mut writer = BodyWriter::new(state.file.clone(), needle.body_offset(), needle.size);
        writer.write_all(body)?;

        self.directory.set(id, &needle)?;
        Ok(needle)
    }

    /// Write a new needle with a generated id, returning the id
    pub fn put_auto(&self, body: &[u8], filename: &str) -> Result<u64> {
        let id = self.ids.next_id();
        self.put(id, body, filename)?;
        Ok(id)
    }

    /// Look up a needle's metadata
    ///
    /// Fails with `NotFound` if no record exists and `Deleted` if the record
    /// is tombstoned.
    pub fn get_needle(&self, id: u64) -> Result<Needle> {
        let needle = self.directory.get(id)?;
        if needle.is_deleted() {
            return Err(HayError::Deleted(id));
        }
        Ok(needle)
    }

    /// Read a needle's body and extension, verifying the stored checksum
    pub fn get_body(&self, id: u64) -> Result<(Bytes, String)> {
        let needle = self.get_needle(id)?;
        let mut reader = self.reader_for(&needle);

        let mut body = Vec::with_capacity(needle.size as usize);
        reader.read_to_end(&mut body)?;

        let computed = needle::checksum(&body);
        if computed != needle.checksum {
            return Err(HayError::ChecksumMismatch {
                stored: needle.checksum,
                computed,
            });
        }

        Ok((Bytes::from(body), needle.ext))
    }

    /// Sequential reader over a needle's body bytes (no checksum pass)
    pub fn body_reader(&self, id: u64) -> Result<BodyReader> {
        let needle = self.get_needle(id)?;
        Ok(self.reader_for(&needle))
    }

    /// Tombstone a needle
    ///
    /// Fails with `NotFound` if no record exists; deleting an already
    /// tombstoned needle is a no-op. Data-file space is not reclaimed until
    /// compaction.
    pub fn delete(&self, id: u64) -> Result<()> {
        let _guard = self.state.lock();

        let mut needle = self.directory.get(id)?;
        if needle.is_deleted() {
            return Ok(());
        }

        needle.flag = NeedleFlag::Deleted;
        needle.updated_at = unix_now();
        self.directory.set(id, &needle)
    }

    /// Bytes still allocatable in this volume
    pub fn remaining_space(&self) -> u64 {
        let state = self.state.lock();
        self.capacity.saturating_sub(state.current_offset)
    }

    /// Current value of the write cursor
    pub fn current_offset(&self) -> u64 {
        self.state.lock().current_offset
    }

    /// Volume id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Path of the canonical data file
    pub fn data_path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Bump-pointer allocation (lock held by the caller)
    ///
    /// Advances and persists the write cursor before returning, so a crash
    /// after allocation but before the record write leaves a gap in the
    /// file, never an overlap: no other needle will ever claim that range.
    fn allocate(&self, state: &mut VolumeState, body_len: u64, ext_len: u64) -> Result<u64> {
        let total = body_len + needle::header_size(ext_len);
        let remaining = self.capacity.saturating_sub(state.current_offset);
        if total > remaining {
            return Err(HayError::OutOfSpace {
                requested: total,
                remaining,
            });
        }

        let offset = state.current_offset;
        let advanced = offset + total;
        state.file.write_all_at(&advanced.to_be_bytes(), 0)?;
        state.current_offset = advanced;
        Ok(offset)
    }

    fn reader_for(&self, needle: &Needle) -> BodyReader {
        let file = self.state.lock().file.clone();
        BodyReader::new(file, needle.body_offset(), needle.size)
    }
}

/// Read the bootstrap record, if the file carries one
fn read_bootstrap(file: &File) -> Result<Option<u64>> {
    let mut buf = [0u8; BOOTSTRAP_SIZE as usize];
    match file.read_exact_at(&mut buf, 0) {
        Ok(()) => Ok(Some(u64::from_be_bytes(buf))),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Extension of a filename: the substring after the last `.`, empty if the
/// name has no dot or ends with one
pub fn extension_of(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(i) => &filename[i + 1..],
        None => "",
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
