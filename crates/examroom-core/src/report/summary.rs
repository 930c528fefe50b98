use super::*;
use std::collections::HashSet;

/// Counts assignments whose room is not part of the snapshot.
pub fn count_orphaned(rooms: &[Room], assignments: &[Assignment]) -> u32 {
    let known: HashSet<&EntityId> = rooms.iter().map(|r| &r.id).collect();
    assignments
        .iter()
        .filter(|a| !known.contains(&a.room_id))
        .count() as u32
}

impl UtilizationSummary {
    /// Aggregates per-room stats into report totals.
    pub fn from_stats(stats: &[RoomStat], orphaned_assignments: u32, unassigned_students: u32) -> Self {
        let total_capacity: u64 = stats.iter().map(|s| s.capacity as u64).sum();
        let total_assigned: u64 = stats.iter().map(|s| s.assigned_count as u64).sum();
        let overall_utilization_pct = if total_capacity > 0 {
            (total_assigned as f64 / total_capacity as f64) * 100.0
        } else {
            0.0
        };

        let mut summary = Self {
            total_rooms: stats.len() as u32,
            total_capacity,
            total_assigned,
            overall_utilization_pct,
            orphaned_assignments,
            unassigned_students,
            ..Self::default()
        };

        for stat in stats {
            match stat.status {
                RoomStatus::Free => summary.free_rooms += 1,
                RoomStatus::Good => summary.good_rooms += 1,
                RoomStatus::Full => summary.full_rooms += 1,
                RoomStatus::Over => summary.over_capacity_rooms += 1,
            }
        }

        summary
    }
}
