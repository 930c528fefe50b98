use super::*;
use std::collections::HashSet;

/// Ids of every student holding at least one assignment.
///
/// This is the single definition of "assigned" used across the engine.
pub fn assigned_student_ids(assignments: &[Assignment]) -> HashSet<&EntityId> {
    assignments.iter().map(|a| &a.student_id).collect()
}

/// Students that no assignment refers to, in their original order.
pub fn find_unassigned(students: &[Student], assignments: &[Assignment]) -> Vec<Student> {
    let assigned = assigned_student_ids(assignments);

    students
        .iter()
        .filter(|student| !assigned.contains(&student.id))
        .cloned()
        .collect()
}
