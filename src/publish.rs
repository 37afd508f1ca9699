//! Snapshot-and-swap publication of scan readouts.
//!
//! The pipeline itself is single-threaded. When ticks are processed on one
//! thread and readouts consumed on another, the producer publishes a complete
//! [`ScanSnapshot`] after each tick and readers load the latest one. Readers
//! never observe a half-updated set of fields.

use std::sync::{Arc, PoisonError, RwLock};

use crate::pipeline::ScanSnapshot;

/// Shared slot holding the most recently published snapshot.
///
/// Cloning yields another handle to the same slot.
#[derive(Debug, Clone)]
pub struct SnapshotCell {
    slot: Arc<RwLock<Arc<ScanSnapshot>>>,
}

impl SnapshotCell {
    pub fn new(initial: ScanSnapshot) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    /// Replace the current snapshot.
    pub fn publish(&self, snapshot: ScanSnapshot) {
        let next = Arc::new(snapshot);
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }

    /// Latest snapshot. Cheap: clones an `Arc`, not the data.
    pub fn load(&self) -> Arc<ScanSnapshot> {
        let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }
}
