//! Derived-state engine for exam room management.
//!
//! Everything in this crate is a pure function of an entity snapshot: room
//! utilization and status, students without a seat, schedule double-bookings
//! and the generic search/filter/sort/paginate view used by every table.

pub mod report;
pub mod schedule;
pub mod snapshot;
pub mod types;
pub mod view;
pub mod wire;

pub use report::{assigned_student_ids, compute_room_stats, count_orphaned, find_unassigned};
pub use schedule::{check_candidate, find_conflicts, validate_entry, ConflictPolicy};
pub use snapshot::Snapshot;
pub use types::*;
pub use view::{apply_view, FieldValue, Filter, Page, Predicate, SortOrder, ViewConfig, Viewable};
