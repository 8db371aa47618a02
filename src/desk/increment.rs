use chrono::{NaiveDateTime, NaiveTime};

use crate::model::{IncrementKind, IncrementRequest};

use super::{DeskError, DeskService};

/// Latest representable instant of a day; chrono has no `NaiveTime::MAX`.
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).expect("valid end-of-day time")
}

/// Effective `[start, end]` window of an increment request.
///
/// An explicit starting time only applies outside half-morning mode, and an
/// explicit ending time only outside half-afternoon mode; the half-day rules
/// pin their edge to start-of-day / end-of-day.
pub(super) fn resolve_window(request: &IncrementRequest) -> (NaiveDateTime, NaiveDateTime) {
    let start = match request.starting_time {
        Some(time) if request.kind != IncrementKind::HalfMorning => {
            request.starting_date.and_time(time)
        }
        _ => request.starting_date.and_time(NaiveTime::MIN),
    };
    let end = match request.ending_time {
        Some(time) if request.kind != IncrementKind::HalfAfternoon => {
            request.ending_date.and_time(time)
        }
        _ => request.ending_date.and_time(end_of_day()),
    };
    (start, end)
}

impl DeskService {
    /// Resolve the request's effective window and lace flag, then delegate
    /// the per-slot application to the bulk-mutation collaborator. No locking
    /// happens here.
    pub async fn increment_capacity(&self, request: IncrementRequest) -> Result<(), DeskError> {
        let (start, end) = resolve_window(&request);
        let lace = request.kind == IncrementKind::Lace;
        self.bulk
            .increment_max_capacity(
                request.form_id,
                request.incrementing_value,
                start,
                end,
                lace,
            )
            .await
    }
}
