use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Persistent slot identifier. `TRANSIENT_SLOT_ID` marks a slot that has not
/// been saved yet.
pub type SlotId = u32;

/// Identifier of the form (bookable service) a slot belongs to.
pub type FormId = u32;

pub const TRANSIENT_SLOT_ID: SlotId = 0;

/// A discrete bookable time interval carrying a capacity counter.
///
/// The three `nb_*` counters and `max_capacity` are only ever mutated through
/// the locked read-modify-write in the desk service; `nb_places_taken` is
/// authoritative from the persisted record and a caller-supplied value is
/// never trusted during a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub form_id: FormId,
    pub starting_date_time: NaiveDateTime,
    pub ending_date_time: NaiveDateTime,
    /// Derived calendar fields, filled when the slot is materialized.
    pub date: Option<NaiveDate>,
    pub starting_time: Option<NaiveTime>,
    pub ending_time: Option<NaiveTime>,
    pub max_capacity: i32,
    pub nb_remaining_places: i32,
    pub nb_potential_remaining_places: i32,
    pub nb_places_taken: i32,
    pub is_open: bool,
    /// Derived flag: the slot deviates from its form's planning. Recomputed
    /// on every mutation via the external policy.
    pub is_specific: bool,
}

impl Slot {
    /// Transient value object as handed in by an external caller. Remaining
    /// places stay at zero until the slot is materialized.
    pub fn new(
        form_id: FormId,
        starting_date_time: NaiveDateTime,
        ending_date_time: NaiveDateTime,
        max_capacity: i32,
    ) -> Self {
        Self {
            id: TRANSIENT_SLOT_ID,
            form_id,
            starting_date_time,
            ending_date_time,
            date: None,
            starting_time: None,
            ending_time: None,
            max_capacity,
            nb_remaining_places: 0,
            nb_potential_remaining_places: 0,
            nb_places_taken: 0,
            is_open: false,
            is_specific: false,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.id == TRANSIENT_SLOT_ID
    }

    /// Fill the derived calendar fields from the starting/ending instants.
    pub fn add_date_and_time(&mut self) {
        self.date = Some(self.starting_date_time.date());
        self.starting_time = Some(self.starting_date_time.time());
        self.ending_time = Some(self.ending_date_time.time());
    }
}

/// A date on which a form's slots are fully blocked from capacity changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingDay {
    pub form_id: FormId,
    pub date: NaiveDate,
}

/// How a bulk increment distributes its delta over the resolved window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncrementKind {
    /// Uniform delta on every slot in the window.
    Flat,
    /// Interleave the added capacity across slots.
    Lace,
    /// Morning half only: the window starts at start-of-day regardless of any
    /// explicit starting time.
    HalfMorning,
    /// Afternoon half only: the window ends at end-of-day regardless of any
    /// explicit ending time.
    HalfAfternoon,
}

/// One bulk capacity increment over a date range. Consumed once per call;
/// never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementRequest {
    pub form_id: FormId,
    pub starting_date: NaiveDate,
    pub starting_time: Option<NaiveTime>,
    pub ending_date: NaiveDate,
    pub ending_time: Option<NaiveTime>,
    pub incrementing_value: i32,
    pub kind: IncrementKind,
}
