//! Store: the volume map
//!
//! An in-process registry of open volumes sharing one data directory and
//! one id generator. Placement across volumes is up to the caller; the
//! store only guarantees unique volume ids.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::VolumeConfig;
use crate::error::{HayError, Result};
use crate::id::{ClockIdGenerator, IdGenerator};
use crate::volume::Volume;

/// Registry of open volumes
pub struct Store {
    config: VolumeConfig,
    ids: Arc<dyn IdGenerator>,
    volumes: RwLock<HashMap<u64, Arc<Volume>>>,
}

impl Store {
    /// Create a store rooted at the configured directory
    pub fn new(config: VolumeConfig) -> Self {
        Self {
            config,
            ids: Arc::new(ClockIdGenerator::default()),
            volumes: RwLock::new(HashMap::new()),
        }
    }

    /// Open a volume and register it; fails with `VolumeExists` if the id
    /// is already registered
    pub fn create_volume(&self, id: u64) -> Result<Arc<Volume>> {
        let mut volumes = self.volumes.write();
        if volumes.contains_key(&id) {
            return Err(HayError::VolumeExists(id));
        }

        let volume = Arc::new(Volume::open_with_ids(
            id,
            self.config.clone(),
            self.ids.clone(),
        )?);
        volumes.insert(id, volume.clone());
        debug!(volume = id, "registered volume");
        Ok(volume)
    }

    /// Look up a registered volume; fails with `VolumeNotFound` if absent
    pub fn volume(&self, id: u64) -> Result<Arc<Volume>> {
        self.volumes
            .read()
            .get(&id)
            .cloned()
            .ok_or(HayError::VolumeNotFound(id))
    }

    /// Number of registered volumes
    pub fn volume_count(&self) -> usize {
        self.volumes.read().len()
    }

    /// The store-wide id generator, shared with callers that assign ids
    /// outside `put_auto`
    pub fn id_generator(&self) -> Arc<dyn IdGenerator> {
        self.ids.clone()
    }
}
