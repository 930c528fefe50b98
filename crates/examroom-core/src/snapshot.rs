use crate::types::*;
use serde::{Deserialize, Serialize};

/// Frozen copy of the backend collections.
///
/// A snapshot is never patched in place: after any add, edit or delete the
/// caller fetches again and replaces the whole value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub rooms: Vec<Room>,
    pub students: Vec<Student>,
    pub assignments: Vec<Assignment>,
    pub schedules: Vec<ScheduleEntry>,
    pub courses: Vec<Course>,
    pub departments: Vec<Department>,
}

impl Snapshot {
    /// Derives the reports view model.
    pub fn dashboard(&self) -> DashboardView {
        DashboardView::build(self)
    }

    /// Rooms that are active and open for booking.
    pub fn bookable_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.is_active && r.is_bookable)
    }

    /// True when the backend returned nothing at all.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
            && self.students.is_empty()
            && self.assignments.is_empty()
            && self.schedules.is_empty()
            && self.courses.is_empty()
            && self.departments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_yaml_with_missing_collections() {
        let yaml = r#"
rooms:
  - id: 1
    building_name: BA
    room_number: "1130"
    capacity: 40
    is_bookable: false
  - id: 2
    building_name: SS
    room_number: "2117"
    capacity: 120
    testing_capacity: 60
assignments:
  - student_id: 10
    room_id: 2
    student_name: Ada Lovelace
"#;
        let snapshot: Snapshot = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(snapshot.rooms.len(), 2);
        assert!(snapshot.students.is_empty());
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.bookable_rooms().count(), 1);
        assert_eq!(snapshot.rooms[1].effective_capacity(), 60);
        assert!(Snapshot::default().is_empty());

        let view = snapshot.dashboard();
        assert_eq!(view.room_stats[1].assigned_count, 1);
    }
}
