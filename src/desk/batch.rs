use tracing::{debug, error};

use crate::model::Slot;
use crate::observability;

use super::DeskService;

impl DeskService {
    /// Close one unit of capacity on each slot, in order. Best-effort: a
    /// failure on one slot is logged and the remaining slots still run.
    pub async fn close_slots(&self, slots: Vec<Slot>) {
        debug!(count = slots.len(), "closing slots");
        for slot in slots {
            let slot = match self.materialize_if_transient(slot).await {
                Some(slot) => slot,
                None => continue,
            };
            if let Err(e) = self.close_slot(&slot).await {
                error!(error = %e, slot_id = slot.id, "failed to close slot");
            }
        }
    }

    /// Open one unit of capacity on each slot, in order, up to `ceiling`.
    ///
    /// The closing-day gate is consulted once, with the first slot's form and
    /// date; a hit abandons the entire batch before any slot is touched, even
    /// slots on other dates. Otherwise per-slot failures are logged and the
    /// remaining slots still run.
    pub async fn open_slots(&self, slots: Vec<Slot>, ceiling: i32) {
        if let Some(first) = slots.first() {
            let date = first.starting_date_time.date();
            match self
                .closing_days
                .find_by_form_and_date(first.form_id, date)
                .await
            {
                Ok(None) => {}
                Ok(Some(_)) => {
                    debug!(form_id = first.form_id, %date, "closing day, batch skipped");
                    metrics::counter!(observability::CLOSING_DAY_SKIPS_TOTAL).increment(1);
                    return;
                }
                Err(e) => {
                    // Unknown closing state: refuse to open anything.
                    error!(error = %e, form_id = first.form_id, "closing day lookup failed, batch skipped");
                    return;
                }
            }
        }

        debug!(count = slots.len(), ceiling, "opening slots");
        for slot in slots {
            let slot = match self.materialize_if_transient(slot).await {
                Some(slot) => slot,
                None => continue,
            };
            if let Err(e) = self.open_slot(&slot, ceiling).await {
                error!(error = %e, slot_id = slot.id, "failed to open slot");
            }
        }
    }

    async fn materialize_if_transient(&self, slot: Slot) -> Option<Slot> {
        if !slot.is_transient() {
            return Some(slot);
        }
        match self.materialize(&slot).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                error!(error = %e, form_id = slot.form_id, "failed to materialize slot");
                None
            }
        }
    }
}
