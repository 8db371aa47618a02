use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use dashmap::DashMap;

use crate::model::{ClosingDay, FormId, Slot, SlotId};

use super::store::{BulkCapacityWriter, ClosingDayGate, SlotStore, SpecificSlotPolicy, TxContext};
use super::DeskError;

/// In-memory slot table with explicit transactions, backing tests and
/// embedders that run without a real database.
pub struct MemorySlotStore {
    slots: DashMap<SlotId, Slot>,
    next_id: AtomicU32,
    next_tx: AtomicU64,
    /// Undo log per open transaction: value of each written slot before the
    /// write (`None` for freshly created ids).
    tx_undo: DashMap<u64, Vec<(SlotId, Option<Slot>)>>,
    /// Countdown of injected persist failures.
    fail_persists: AtomicU32,
    tx_begun: AtomicU64,
}

impl Default for MemorySlotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next_id: AtomicU32::new(1),
            next_tx: AtomicU64::new(1),
            tx_undo: DashMap::new(),
            fail_persists: AtomicU32::new(0),
            tx_begun: AtomicU64::new(0),
        }
    }

    /// Insert an already-persisted slot under its own id.
    pub fn seed(&self, slot: Slot) {
        debug_assert!(!slot.is_transient(), "seeded slots need a real id");
        if slot.id >= self.next_id.load(Ordering::SeqCst) {
            self.next_id.store(slot.id + 1, Ordering::SeqCst);
        }
        self.slots.insert(slot.id, slot);
    }

    pub fn get(&self, id: SlotId) -> Option<Slot> {
        self.slots.get(&id).map(|e| e.value().clone())
    }

    pub fn all(&self) -> Vec<Slot> {
        self.slots.iter().map(|e| e.value().clone()).collect()
    }

    /// Fail the next `n` persist calls with a persistence error.
    pub fn fail_persists(&self, n: u32) {
        self.fail_persists.store(n, Ordering::SeqCst);
    }

    /// Number of transactions begun so far.
    pub fn tx_count(&self) -> u64 {
        self.tx_begun.load(Ordering::SeqCst)
    }

    /// Transactions begun but neither committed nor rolled back.
    pub fn open_tx_count(&self) -> usize {
        self.tx_undo.len()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn load_by_id(&self, id: SlotId) -> Result<Slot, DeskError> {
        self.get(id).ok_or(DeskError::NotFound(id))
    }

    async fn persist(&self, slot: &Slot, tx: Option<&TxContext>) -> Result<Slot, DeskError> {
        if self
            .fail_persists
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DeskError::Persistence("injected persist failure".into()));
        }

        let mut stored = slot.clone();
        if stored.is_transient() {
            stored.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        }

        let previous = self.slots.insert(stored.id, stored.clone());
        if let Some(tx) = tx {
            let mut undo = self
                .tx_undo
                .get_mut(&tx.token())
                .ok_or_else(|| DeskError::Persistence("unknown transaction".into()))?;
            undo.push((stored.id, previous));
        }
        Ok(stored)
    }

    async fn begin(&self) -> Result<TxContext, DeskError> {
        let token = self.next_tx.fetch_add(1, Ordering::SeqCst);
        self.tx_undo.insert(token, Vec::new());
        self.tx_begun.fetch_add(1, Ordering::SeqCst);
        Ok(TxContext::new(token))
    }

    async fn commit(&self, tx: TxContext) -> Result<(), DeskError> {
        self.tx_undo
            .remove(&tx.token())
            .map(|_| ())
            .ok_or_else(|| DeskError::Persistence("unknown transaction".into()))
    }

    async fn rollback(&self, tx: TxContext) -> Result<(), DeskError> {
        let (_, undo) = self
            .tx_undo
            .remove(&tx.token())
            .ok_or_else(|| DeskError::Persistence("unknown transaction".into()))?;
        for (id, previous) in undo.into_iter().rev() {
            match previous {
                Some(slot) => {
                    self.slots.insert(id, slot);
                }
                None => {
                    self.slots.remove(&id);
                }
            }
        }
        Ok(())
    }
}

/// In-memory closing day table keyed by form + date.
pub struct MemoryClosingDays {
    days: DashMap<(FormId, NaiveDate), ClosingDay>,
    fail_lookups: AtomicU32,
}

impl Default for MemoryClosingDays {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClosingDays {
    pub fn new() -> Self {
        Self {
            days: DashMap::new(),
            fail_lookups: AtomicU32::new(0),
        }
    }

    pub fn add(&self, day: ClosingDay) {
        self.days.insert((day.form_id, day.date), day);
    }

    /// Fail the next `n` lookups with a gate error.
    pub fn fail_lookups(&self, n: u32) {
        self.fail_lookups.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl ClosingDayGate for MemoryClosingDays {
    async fn find_by_form_and_date(
        &self,
        form_id: FormId,
        date: NaiveDate,
    ) -> Result<Option<ClosingDay>, DeskError> {
        if self
            .fail_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DeskError::Gate("injected lookup failure".into()));
        }
        Ok(self.days.get(&(form_id, date)).map(|e| e.value().clone()))
    }
}

/// Marks a slot specific when its capacity differs from the form's reference
/// capacity. Forms without a reference never produce specific slots.
pub struct ReferenceCapacityPolicy {
    references: DashMap<FormId, i32>,
}

impl Default for ReferenceCapacityPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceCapacityPolicy {
    pub fn new() -> Self {
        Self {
            references: DashMap::new(),
        }
    }

    pub fn set_reference(&self, form_id: FormId, max_capacity: i32) {
        self.references.insert(form_id, max_capacity);
    }
}

impl SpecificSlotPolicy for ReferenceCapacityPolicy {
    fn is_specific(&self, slot: &Slot) -> bool {
        self.references
            .get(&slot.form_id)
            .is_some_and(|reference| *reference.value() != slot.max_capacity)
    }
}

/// One delegated bulk increment as received by `RecordingBulkWriter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkIncrement {
    pub form_id: FormId,
    pub incrementing_value: i32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub lace: bool,
}

/// Captures delegated increments for assertion in tests.
#[derive(Default)]
pub struct RecordingBulkWriter {
    calls: Mutex<Vec<BulkIncrement>>,
}

impl RecordingBulkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BulkIncrement> {
        self.calls.lock().expect("recorder lock poisoned").clone()
    }
}

#[async_trait]
impl BulkCapacityWriter for RecordingBulkWriter {
    async fn increment_max_capacity(
        &self,
        form_id: FormId,
        incrementing_value: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
        lace: bool,
    ) -> Result<(), DeskError> {
        self.calls
            .lock()
            .expect("recorder lock poisoned")
            .push(BulkIncrement {
                form_id,
                incrementing_value,
                start,
                end,
                lace,
            });
        Ok(())
    }
}
