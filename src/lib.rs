//! Concurrent capacity management for bookable time slots.
//!
//! Each slot is guarded by its own lazily-created lock; every capacity
//! mutation is a transactional read-modify-write that re-reads persisted
//! state under that lock, so concurrent callers never lose updates and
//! unrelated slots never block each other. Persistence, closing-day lookup
//! and the bulk distribution algorithm stay behind collaborator traits.

pub mod desk;
pub mod model;
pub mod observability;

pub use desk::{DeskError, DeskService};
pub use model::{ClosingDay, IncrementKind, IncrementRequest, Slot};
