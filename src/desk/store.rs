use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{ClosingDay, FormId, Slot, SlotId};

use super::DeskError;

/// Opaque unit-of-work token handed out by `SlotStore::begin` and consumed by
/// exactly one `commit` or `rollback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxContext(u64);

impl TxContext {
    pub fn new(token: u64) -> Self {
        Self(token)
    }

    pub fn token(&self) -> u64 {
        self.0
    }
}

/// Persistence boundary for slot records.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Fresh read of the persisted record.
    async fn load_by_id(&self, id: SlotId) -> Result<Slot, DeskError>;

    /// Persist a slot, assigning an id if it is transient. `tx` scopes the
    /// write to an active unit of work; `None` autocommits.
    async fn persist(&self, slot: &Slot, tx: Option<&TxContext>) -> Result<Slot, DeskError>;

    async fn begin(&self) -> Result<TxContext, DeskError>;
    async fn commit(&self, tx: TxContext) -> Result<(), DeskError>;
    async fn rollback(&self, tx: TxContext) -> Result<(), DeskError>;
}

/// Lookup of fully blocked days.
#[async_trait]
pub trait ClosingDayGate: Send + Sync {
    async fn find_by_form_and_date(
        &self,
        form_id: FormId,
        date: NaiveDate,
    ) -> Result<Option<ClosingDay>, DeskError>;
}

/// External planning-comparison policy deciding whether a slot deviates from
/// its form's typical shape.
pub trait SpecificSlotPolicy: Send + Sync {
    fn is_specific(&self, slot: &Slot) -> bool;
}

/// Downstream bulk-mutation collaborator for range increments. The actual
/// per-slot distribution algorithm lives behind this trait.
#[async_trait]
pub trait BulkCapacityWriter: Send + Sync {
    async fn increment_max_capacity(
        &self,
        form_id: FormId,
        incrementing_value: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
        lace: bool,
    ) -> Result<(), DeskError>;
}
