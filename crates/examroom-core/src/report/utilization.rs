use super::*;
use std::collections::HashMap;
use tracing::debug;

/// Utilization above which a room is reported as nearly full.
const NEARLY_FULL_THRESHOLD_PERCENT: f64 = 90.0;

impl RoomStatus {
    /// Classifies a room. Over capacity wins over every other rule, since an
    /// overbooked room is also above the nearly-full threshold.
    pub fn classify(assigned_count: u32, utilization_pct: f64, is_over_capacity: bool) -> Self {
        if is_over_capacity {
            RoomStatus::Over
        } else if assigned_count == 0 {
            RoomStatus::Free
        } else if utilization_pct > NEARLY_FULL_THRESHOLD_PERCENT {
            RoomStatus::Full
        } else {
            RoomStatus::Good
        }
    }
}

impl RoomStat {
    fn empty(room: &Room) -> Self {
        Self {
            room_id: room.id.clone(),
            building_name: room.building_name.clone(),
            room_number: room.room_number.clone(),
            capacity: room.effective_capacity(),
            assigned_count: 0,
            assigned_students: Vec::new(),
            utilization_pct: 0.0,
            is_over_capacity: false,
            status: RoomStatus::Free,
        }
    }

    fn push_student(&mut self, name: &str) {
        self.assigned_count += 1;
        self.assigned_students.push(name.to_string());
    }

    /// Derives percentage, overbooking flag and status from the counts.
    fn finish(&mut self) {
        self.utilization_pct = if self.capacity > 0 {
            (self.assigned_count as f64 / self.capacity as f64) * 100.0
        } else {
            0.0
        };
        self.is_over_capacity = self.assigned_count > self.capacity;
        self.status =
            RoomStatus::classify(self.assigned_count, self.utilization_pct, self.is_over_capacity);
    }
}

/// Folds assignments over rooms into one stat per room, in room order.
///
/// Assignments whose `room_id` matches no room are skipped; the totals then
/// simply under-count. A room id listed twice keeps its first position but
/// takes the later room's attributes.
pub fn compute_room_stats(rooms: &[Room], assignments: &[Assignment]) -> Vec<RoomStat> {
    let mut index: HashMap<&EntityId, usize> = HashMap::with_capacity(rooms.len());
    let mut stats: Vec<RoomStat> = Vec::with_capacity(rooms.len());

    for room in rooms {
        match index.get(&room.id) {
            Some(&idx) => stats[idx] = RoomStat::empty(room),
            None => {
                index.insert(&room.id, stats.len());
                stats.push(RoomStat::empty(room));
            }
        }
    }

    for assignment in assignments {
        match index.get(&assignment.room_id) {
            Some(&idx) => stats[idx].push_student(&assignment.student_name),
            None => debug!(
                room_id = %assignment.room_id,
                student_id = %assignment.student_id,
                "skipping assignment for unknown room"
            ),
        }
    }

    for stat in &mut stats {
        stat.finish();
    }

    stats
}
