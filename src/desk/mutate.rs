use std::time::Instant;

use tracing::error;

use crate::model::Slot;
use crate::observability;

use super::{DeskError, DeskService};

/// Result of one locked read-modify-write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MutationOutcome {
    Applied,
    /// Clamp reached — valid silent termination, no transaction ran.
    NoOp,
}

impl DeskService {
    /// Decrement the slot's capacity by one under its lock.
    ///
    /// The persisted record is re-read under the lock; the caller's counters
    /// are never trusted. A persisted capacity at or below zero is the floor
    /// clamp: no transaction, no log.
    pub(super) async fn close_slot(&self, slot: &Slot) -> Result<MutationOutcome, DeskError> {
        let lock = self.locks.lock_for(slot.id);
        let _guard = lock.lock().await;

        let fresh = self.store.load_by_id(slot.id).await?;
        if fresh.max_capacity <= 0 {
            metrics::counter!(observability::CAPACITY_NOOPS_TOTAL).increment(1);
            return Ok(MutationOutcome::NoOp);
        }

        let mut updated = slot.clone();
        updated.max_capacity = fresh.max_capacity - 1;
        updated.nb_remaining_places = fresh.nb_remaining_places - 1;
        updated.nb_potential_remaining_places = fresh.nb_potential_remaining_places - 1;
        updated.nb_places_taken = fresh.nb_places_taken;
        updated.is_specific = self.policy.is_specific(&updated);

        self.persist_mutation(&updated).await?;
        metrics::counter!(observability::SLOTS_CLOSED_TOTAL).increment(1);
        Ok(MutationOutcome::Applied)
    }

    /// Increment the slot's capacity by one under its lock, up to `ceiling`.
    /// An applied open also reopens the slot for booking.
    pub(super) async fn open_slot(
        &self,
        slot: &Slot,
        ceiling: i32,
    ) -> Result<MutationOutcome, DeskError> {
        let lock = self.locks.lock_for(slot.id);
        let _guard = lock.lock().await;

        let fresh = self.store.load_by_id(slot.id).await?;
        if fresh.max_capacity >= ceiling {
            metrics::counter!(observability::CAPACITY_NOOPS_TOTAL).increment(1);
            return Ok(MutationOutcome::NoOp);
        }

        let mut updated = slot.clone();
        updated.max_capacity = fresh.max_capacity + 1;
        updated.nb_remaining_places = fresh.nb_remaining_places + 1;
        updated.nb_potential_remaining_places = fresh.nb_potential_remaining_places + 1;
        updated.nb_places_taken = fresh.nb_places_taken;
        updated.is_open = true;
        updated.is_specific = self.policy.is_specific(&updated);

        self.persist_mutation(&updated).await?;
        metrics::counter!(observability::SLOTS_OPENED_TOTAL).increment(1);
        Ok(MutationOutcome::Applied)
    }

    /// Begin immediately before the persist, commit on success, roll back on
    /// failure. The caller still holds the slot lock for the whole unit of
    /// work and releases it on every exit path.
    async fn persist_mutation(&self, slot: &Slot) -> Result<(), DeskError> {
        let started = Instant::now();
        let tx = self.store.begin().await?;
        match self.store.persist(slot, Some(&tx)).await {
            Ok(_) => {
                self.store.commit(tx).await?;
                metrics::histogram!(observability::MUTATION_DURATION_SECONDS)
                    .record(started.elapsed().as_secs_f64());
                Ok(())
            }
            Err(e) => {
                metrics::counter!(observability::PERSIST_FAILURES_TOTAL).increment(1);
                if let Err(rb) = self.store.rollback(tx).await {
                    error!(error = %rb, slot_id = slot.id, "rollback failed after persist error");
                }
                Err(e)
            }
        }
    }
}
