use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a backend entity.
///
/// The REST backend is not consistent about id types: some collections send
/// integers, others strings. Both are accepted and kept as text so that
/// `room_id: 7` and `"room_id": "7"` refer to the same room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct EntityId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Integer(i64),
    Text(String),
}

impl From<RawId> for EntityId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Integer(n) => EntityId(n.to_string()),
            RawId::Text(s) => EntityId(s),
        }
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId(n.to_string())
    }
}

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn default_true() -> bool {
    true
}

/// Physical room that can host exams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    #[serde(default)]
    pub building_name: String,
    #[serde(default)]
    pub room_number: String,
    /// General seating capacity
    #[serde(default)]
    pub capacity: u32,
    /// Seats usable under exam conditions; zero or missing means "same as capacity"
    #[serde(default)]
    pub testing_capacity: Option<u32>,
    /// Older name for `testing_capacity`, still sent by some endpoints
    #[serde(default)]
    pub exam_capacity: Option<u32>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_bookable: bool,
}

impl Room {
    /// Capacity used for every utilization calculation: the first positive
    /// of `testing_capacity` and `exam_capacity`, else `capacity`.
    pub fn effective_capacity(&self) -> u32 {
        [self.testing_capacity, self.exam_capacity]
            .into_iter()
            .flatten()
            .find(|&seats| seats > 0)
            .unwrap_or(self.capacity)
    }

    /// Display name such as "BA 1130".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.building_name, self.room_number)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: EntityId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub student_number: Option<String>,
    /// University-issued login id, unrelated to `Assignment::student_id`
    #[serde(default)]
    pub student_id: Option<String>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Binding of one student to one room for one exam
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(default)]
    pub assignment_id: Option<EntityId>,
    /// References `Student::id`
    pub student_id: EntityId,
    /// References `Room::id`
    pub room_id: EntityId,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub exam_date: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    #[default]
    Exam,
    Class,
    Event,
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Exam => "exam",
            ScheduleKind::Class => "class",
            ScheduleKind::Event => "event",
        }
    }
}

/// Room booking on a given date.
///
/// `date` is an ISO `YYYY-MM-DD` string and both times are zero-padded
/// 24-hour `HH:MM` strings, so plain string comparison orders them correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Missing for a candidate that has not been saved yet
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ScheduleKind,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    pub building_code: String,
    pub room_number: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub expected_students: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    pub course_code: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub department_id: Option<EntityId>,
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub expected_students: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub faculty: Option<String>,
}

/// Occupancy class of a room, derived from its stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Over,
    Free,
    Full,
    Good,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Over => "over",
            RoomStatus::Free => "free",
            RoomStatus::Full => "full",
            RoomStatus::Good => "good",
        }
    }

    /// Label shown in report tables.
    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Over => "⚠️ Over",
            RoomStatus::Free => "🟢 Free",
            RoomStatus::Full => "🟡 Full",
            RoomStatus::Good => "🟢 Good",
        }
    }
}

/// Occupancy of one room, recomputed from assignments on every snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomStat {
    pub room_id: EntityId,
    pub building_name: String,
    pub room_number: String,
    /// Effective exam capacity (testing capacity when set)
    pub capacity: u32,
    pub assigned_count: u32,
    /// Student names in assignment order
    pub assigned_students: Vec<String>,
    pub utilization_pct: f64,
    pub is_over_capacity: bool,
    pub status: RoomStatus,
}

/// Totals shown above the per-room report table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilizationSummary {
    pub total_rooms: u32,
    pub total_capacity: u64,
    pub total_assigned: u64,
    pub overall_utilization_pct: f64,
    pub free_rooms: u32,
    pub good_rooms: u32,
    pub full_rooms: u32,
    pub over_capacity_rooms: u32,
    /// Assignments pointing at a room that is not in the snapshot
    pub orphaned_assignments: u32,
    pub unassigned_students: u32,
}

/// Everything the reports screen derives from one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub room_stats: Vec<RoomStat>,
    pub unassigned_students: Vec<Student>,
    pub summary: UtilizationSummary,
}

/// Error type for the engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Schedule conflicts with existing entries: {}", .conflicting_ids.join(", "))]
    ScheduleConflict { conflicting_ids: Vec<String> },
}

pub type Result<T> = std::result::Result<T, EngineError>;
