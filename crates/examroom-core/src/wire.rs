//! Response envelopes of the external REST backend.
//!
//! Only the fields the engine depends on are modelled; anything else the
//! backend sends is ignored.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// A paginated list response.
pub trait Paged {
    type Item;

    /// Collection path, e.g. `/rooms`.
    const PATH: &'static str;

    fn total_pages(&self) -> u32;
    fn into_items(self) -> Vec<Self::Item>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomsPage {
    pub rooms: Vec<Room>,
    pub total_pages: u32,
    pub total_items: u32,
    pub total_active: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentsPage {
    pub students: Vec<Student>,
    pub total_pages: u32,
    pub total_items: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentsPage {
    pub assignments: Vec<Assignment>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulesPage {
    pub schedules: Vec<ScheduleEntry>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u32,
}

/// Reply of `POST /assign-students`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRunResponse {
    pub message: String,
}

macro_rules! paged {
    ($page:ty, $item:ty, $field:ident, $path:literal) => {
        impl Paged for $page {
            type Item = $item;

            const PATH: &'static str = $path;

            fn total_pages(&self) -> u32 {
                self.total_pages
            }

            fn into_items(self) -> Vec<$item> {
                self.$field
            }
        }
    };
}

paged!(RoomsPage, Room, rooms, "/rooms");
paged!(StudentsPage, Student, students, "/students");
paged!(AssignmentsPage, Assignment, assignments, "/assignments");
paged!(SchedulesPage, ScheduleEntry, schedules, "/schedules");
