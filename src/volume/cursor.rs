//! Bounded body cursors
//!
//! Sequential access to one needle's body region inside a volume's data
//! file. Both cursors hold a shared handle to the volume's open file and
//! are bounded to `[start, start + len)`: a reader past the bound signals
//! end-of-stream, a writer past the bound fails with `RecordTooSmall`.
//!
//! The handle is an `Arc<File>`, never an independently opened file. If a
//! compaction swaps the volume's data file mid-read, this cursor keeps the
//! old inode alive and readable until it drops.

use std::fs::File;
use std::io::{self, Read};
use std::os::unix::fs::FileExt;
use std::sync::Arc;

use crate::error::{HayError, Result};

/// Sequential reader over a needle's body bytes
pub struct BodyReader {
    file: Arc<File>,
    start: u64,
    len: u64,
    pos: u64,
}

impl BodyReader {
    pub(crate) fn new(file: Arc<File>, start: u64, len: u64) -> Self {
        Self {
            file,
            start,
            len,
            pos: 0,
        }
    }

    /// Bytes left before end-of-body
    pub fn remaining(&self) -> u64 {
        self.len - self.pos
    }
}

impl Read for BodyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.len - self.pos;
        if remaining == 0 {
            return Ok(0);
        }

        let want = buf.len().min(remaining as usize);
        let n = self.file.read_at(&mut buf[..want], self.start + self.pos)?;
        self.pos += n as u64;
        Ok(n)
    }
}

/// Sequential writer into a needle's allocated body region
pub(crate) struct BodyWriter {
    file: Arc<File>,
    start: u64,
    len: u64,
    pos: u64,
}

impl BodyWriter {
    pub(crate) fn new(file: Arc<File>, start: u64, len: u64) -> Self {
        Self {
            file,
            start,
            len,
            pos: 0,
        }
    }

    /// Append `buf` to the body region; the allocated region cannot grow,
    /// so overflow fails with `RecordTooSmall`
    pub(crate) fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let remaining = self.len - self.pos;
        if buf.len() as u64 > remaining {
            return Err(HayError::RecordTooSmall {
                requested: buf.len() as u64,
                remaining,
            });
        }

        self.file.write_all_at(buf, self.start + self.pos)?;
        self.pos += buf.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn scratch_file() -> Arc<File> {
        Arc::new(tempfile::tempfile().unwrap())
    }

    #[test]
    fn reader_stops_at_the_bound() {
        let file = scratch_file();
        file.write_all_at(b"0123456789", 0).unwrap();

        let mut reader = BodyReader::new(file, 2, 5);
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();

        assert_eq!(buf, b"23456");
        assert_eq!(reader.remaining(), 0);

        // Past the bound: EOF, not an error
        let mut extra = [0u8; 4];
        assert_eq!(reader.read(&mut extra).unwrap(), 0);
    }

    #[test]
    fn writer_rejects_overflow() {
        let file = scratch_file();
        let mut writer = BodyWriter::new(file.clone(), 0, 4);

        writer.write_all(b"abc").unwrap();
        let err = writer.write_all(b"de").unwrap_err();
        assert!(matches!(
            err,
            HayError::RecordTooSmall {
                requested: 2,
                remaining: 1
            }
        ));

        // The in-bound prefix landed; nothing past it was written
        let mut buf = [0u8; 3];
        file.read_exact_at(&mut buf, 0).unwrap();
        assert_eq!(&buf, b"abc");
    }

    #[test]
    fn writer_fills_region_exactly() {
        let file = scratch_file();
        let mut writer = BodyWriter::new(file.clone(), 0, 3);
        writer.write_all(b"xyz").unwrap();
        assert!(writer.write_all(b"!").is_err());
    }
}
