use super::{FieldValue, Viewable};
use crate::types::*;

fn text(value: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(value.to_string()))
}

fn opt_text(value: &Option<String>) -> Option<FieldValue> {
    value.as_deref().and_then(text)
}

/// Integer ids become numbers so they sort 1, 2, 10 rather than 1, 10, 2.
fn id(value: &EntityId) -> Option<FieldValue> {
    match value.as_str().parse::<i64>() {
        Ok(n) => Some(FieldValue::Number(n as f64)),
        Err(_) => text(value.as_str()),
    }
}

impl Viewable for Room {
    const SEARCH_FIELDS: &'static [&'static str] = &["building_name", "room_number", "room_type"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => id(&self.id),
            "building_name" => text(&self.building_name),
            "room_number" => text(&self.room_number),
            "name" => Some(self.display_name().into()),
            "capacity" => Some(self.capacity.into()),
            "exam_capacity" | "testing_capacity" => Some(self.effective_capacity().into()),
            "room_type" => opt_text(&self.room_type),
            "is_active" => Some(self.is_active.into()),
            "is_bookable" => Some(self.is_bookable.into()),
            _ => None,
        }
    }
}

impl Viewable for Student {
    const SEARCH_FIELDS: &'static [&'static str] =
        &["first_name", "last_name", "student_number", "student_id"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => id(&self.id),
            "first_name" => text(&self.first_name),
            "last_name" => text(&self.last_name),
            "full_name" => Some(self.full_name().into()),
            "student_number" => opt_text(&self.student_number),
            "student_id" => opt_text(&self.student_id),
            _ => None,
        }
    }
}

impl Viewable for Assignment {
    const SEARCH_FIELDS: &'static [&'static str] = &["student_name", "room_name", "course"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "assignment_id" => self.assignment_id.as_ref().and_then(id),
            "student_id" => id(&self.student_id),
            "room_id" => id(&self.room_id),
            "student_name" => text(&self.student_name),
            "room_name" => opt_text(&self.room_name),
            "course" => opt_text(&self.course),
            "exam_date" => opt_text(&self.exam_date),
            _ => None,
        }
    }
}

impl Viewable for ScheduleEntry {
    const SEARCH_FIELDS: &'static [&'static str] =
        &["title", "course_code", "course_name", "building_code", "room_number"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.as_ref().and_then(id),
            "title" => text(&self.title),
            "type" => text(self.kind.as_str()),
            "course_code" => opt_text(&self.course_code),
            "course_name" => opt_text(&self.course_name),
            "building_code" => text(&self.building_code),
            "room_number" => text(&self.room_number),
            "date" => text(&self.date),
            "start_time" => text(&self.start_time),
            "end_time" => text(&self.end_time),
            "expected_students" => self.expected_students.map(FieldValue::from),
            "description" => opt_text(&self.description),
            _ => None,
        }
    }
}

impl Viewable for Course {
    const SEARCH_FIELDS: &'static [&'static str] = &["course_code", "course_name"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => id(&self.id),
            "course_code" => text(&self.course_code),
            "course_name" => text(&self.course_name),
            "department_id" => self.department_id.as_ref().and_then(id),
            "credits" => self.credits.map(FieldValue::from),
            "expected_students" => self.expected_students.map(FieldValue::from),
            _ => None,
        }
    }
}

impl Viewable for Department {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code", "faculty"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => id(&self.id),
            "name" => text(&self.name),
            "code" => opt_text(&self.code),
            "faculty" => opt_text(&self.faculty),
            _ => None,
        }
    }
}

impl Viewable for RoomStat {
    const SEARCH_FIELDS: &'static [&'static str] = &["building_name", "room_number"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "room_id" => id(&self.room_id),
            "building_name" => text(&self.building_name),
            "room_number" => text(&self.room_number),
            "capacity" => Some(self.capacity.into()),
            "assigned_count" => Some(self.assigned_count.into()),
            "utilization_pct" => Some(self.utilization_pct.into()),
            "is_over_capacity" => Some(self.is_over_capacity.into()),
            "status" => text(self.status.as_str()),
            _ => None,
        }
    }
}
