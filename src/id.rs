//! Unique id generation
//!
//! Collaborator interface consumed by `put_auto`: anything producing unique
//! `u64` values works. The default implementation mixes a millisecond
//! timestamp with a wrapping counter, unique within a process as long as
//! fewer than 2^20 ids are drawn per millisecond.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Produces globally-unique u64 ids
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> u64;
}

/// Timestamp-high / counter-low id generator
#[derive(Debug, Default)]
pub struct ClockIdGenerator {
    counter: AtomicU64,
}

/// Low bits reserved for the per-millisecond counter
const COUNTER_BITS: u32 = 20;

impl IdGenerator for ClockIdGenerator {
    fn next_id(&self) -> u64 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) & ((1 << COUNTER_BITS) - 1);
        (millis << COUNTER_BITS) | seq
    }
}
