use crate::snapshot::Snapshot;
use crate::types::*;

mod summary;
mod unassigned;
mod utilization;

pub use summary::count_orphaned;
pub use unassigned::{assigned_student_ids, find_unassigned};
pub use utilization::compute_room_stats;

impl DashboardView {
    /// Recomputes the whole reports view from one snapshot.
    /// There is no incremental update: callers rebuild after every fetch.
    pub fn build(snapshot: &Snapshot) -> Self {
        let room_stats = compute_room_stats(&snapshot.rooms, &snapshot.assignments);
        let unassigned_students = find_unassigned(&snapshot.students, &snapshot.assignments);
        let orphaned = count_orphaned(&snapshot.rooms, &snapshot.assignments);
        let summary = UtilizationSummary::from_stats(
            &room_stats,
            orphaned,
            unassigned_students.len() as u32,
        );

        Self {
            room_stats,
            unassigned_students,
            summary,
        }
    }
}
