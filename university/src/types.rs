//! Common type definitions shared by the storage, service and API layers.
//!
//! # ID Types
//!
//! Every entity carries a surrogate integer identity assigned by the database
//! (`SERIAL` columns). The aliases below keep signatures readable:
//!
//! - [`CourseId`], [`TeacherId`], [`TrainingProgramId`]
//! - [`GroupId`], [`StudentId`]
//! - [`LectureHallId`], [`ScheduleId`]
//!
//! # Entity kinds
//!
//! [`EntityKind`] names each stored kind and knows where it lives, which lets
//! existence checks and natural-key lookups be written once for all kinds.
//! [`EntityKey`] is whatever was used to look an entity up, so a failed lookup
//! can report exactly what was missing.

use serde::Serialize;
use std::fmt;

// Type aliases for IDs
pub type CourseId = i32;
pub type TeacherId = i32;
pub type TrainingProgramId = i32;
pub type GroupId = i32;
pub type StudentId = i32;
pub type LectureHallId = i32;
pub type ScheduleId = i32;

/// The kinds of entity held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Course,
    Teacher,
    TrainingProgram,
    Group,
    Student,
    LectureHall,
    Schedule,
}

impl EntityKind {
    /// Table holding rows of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Course => "courses",
            EntityKind::Teacher => "teachers",
            EntityKind::TrainingProgram => "training_programs",
            EntityKind::Group => "groups",
            EntityKind::Student => "students",
            EntityKind::LectureHall => "lecture_halls",
            EntityKind::Schedule => "schedules",
        }
    }

    /// Unique-indexed column that identifies a row by name, if the kind has one.
    pub fn natural_key_column(&self) -> Option<&'static str> {
        match self {
            EntityKind::Course => Some("name"),
            EntityKind::TrainingProgram => Some("speciality"),
            EntityKind::Group => Some("description"),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Course => "Course",
            EntityKind::Teacher => "Teacher",
            EntityKind::TrainingProgram => "TrainingProgram",
            EntityKind::Group => "Group",
            EntityKind::Student => "Student",
            EntityKind::LectureHall => "LectureHall",
            EntityKind::Schedule => "Schedule",
        };
        f.write_str(name)
    }
}

/// The key a lookup was made with: a surrogate id or a natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    Id(i32),
    Name(String),
}

/// Renders so that `"{kind} {key} not found"` reads naturally for both forms,
/// e.g. "Course with id 5 not found" and "Course algebra not found".
impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Id(id) => write!(f, "with id {id}"),
            EntityKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<i32> for EntityKey {
    fn from(id: i32) -> Self {
        EntityKey::Id(id)
    }
}

impl From<&str> for EntityKey {
    fn from(name: &str) -> Self {
        EntityKey::Name(name.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(name: String) -> Self {
        EntityKey::Name(name)
    }
}
