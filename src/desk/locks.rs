use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::model::SlotId;

/// One mutex per slot id, created lazily on first acquisition. Entries are
/// never removed; the id space is bounded by the slot table, so the map stays
/// proportional to the number of slots ever touched.
pub struct LockRegistry {
    locks: DashMap<SlotId, Arc<Mutex<()>>>,
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LockRegistry {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// The lock guarding `slot_id`. Concurrent first calls for an unseen id
    /// all receive the same mutex — the map entry decides a single winner.
    pub fn lock_for(&self, slot_id: SlotId) -> Arc<Mutex<()>> {
        self.locks.entry(slot_id).or_default().clone()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
