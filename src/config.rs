//! Configuration for haystore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Default volume capacity: 128 GiB, matching the classic haystack layout
/// of a small number of very large data files.
pub const DEFAULT_CAPACITY: u64 = 128 * (1 << 30);

/// Configuration for a volume (and for a store of volumes)
#[derive(Debug, Clone)]
pub struct VolumeConfig {
    /// Root directory for all data files.
    /// Internal structure:
    ///   {dir}/
    ///     ├── 000001.data      (append-only needle data, one per volume)
    ///     └── 000001.index     (redb-backed directory, one per volume)
    pub dir: PathBuf,

    /// Maximum data file size in bytes. Allocation beyond this fails with
    /// `OutOfSpace`. Tests shrink this to exercise the capacity boundary.
    pub capacity: u64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./haystore_data"),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl VolumeConfig {
    /// Create a new config builder
    pub fn builder() -> VolumeConfigBuilder {
        VolumeConfigBuilder::default()
    }
}

/// Builder for VolumeConfig
#[derive(Default)]
pub struct VolumeConfigBuilder {
    config: VolumeConfig,
}

impl VolumeConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dir = path.into();
        self
    }

    /// Set the volume capacity (in bytes)
    pub fn capacity(mut self, bytes: u64) -> Self {
        self.config.capacity = bytes;
        self
    }

    pub fn build(self) -> VolumeConfig {
        self.config
    }
}
