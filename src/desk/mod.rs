mod batch;
mod error;
mod increment;
mod locks;
mod memory;
mod mutate;
mod store;

pub use error::DeskError;
pub use locks::LockRegistry;
pub use memory::{
    BulkIncrement, MemoryClosingDays, MemorySlotStore, RecordingBulkWriter,
    ReferenceCapacityPolicy,
};
pub use store::{BulkCapacityWriter, ClosingDayGate, SlotStore, SpecificSlotPolicy, TxContext};

use std::sync::Arc;

use crate::model::Slot;

/// Domain service coordinating locked capacity mutations over slots.
///
/// Every mutation re-reads the persisted record under the slot's lock, so
/// concurrent deltas compose without loss regardless of interleaving. Batch
/// operations hold at most one slot lock at a time.
pub struct DeskService {
    store: Arc<dyn SlotStore>,
    closing_days: Arc<dyn ClosingDayGate>,
    policy: Arc<dyn SpecificSlotPolicy>,
    bulk: Arc<dyn BulkCapacityWriter>,
    locks: LockRegistry,
}

impl DeskService {
    pub fn new(
        store: Arc<dyn SlotStore>,
        closing_days: Arc<dyn ClosingDayGate>,
        policy: Arc<dyn SpecificSlotPolicy>,
        bulk: Arc<dyn BulkCapacityWriter>,
    ) -> Self {
        Self {
            store,
            closing_days,
            policy,
            bulk,
            locks: LockRegistry::new(),
        }
    }

    /// First touch of a transient slot: fill the derived calendar fields, set
    /// remaining places to full capacity and persist once. Returns the stored
    /// copy carrying its assigned id.
    async fn materialize(&self, slot: &Slot) -> Result<Slot, DeskError> {
        let mut slot = slot.clone();
        slot.add_date_and_time();
        slot.nb_remaining_places = slot.max_capacity;
        slot.nb_potential_remaining_places = slot.max_capacity;
        self.store.persist(&slot, None).await
    }
}
