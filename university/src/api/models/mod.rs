//! Request and response types for the REST API, with their input shape checks.

pub mod courses;
pub mod groups;
pub mod lecture_halls;
pub mod pagination;
pub mod schedules;
pub mod students;
pub mod teachers;
pub mod training_programs;
pub mod validation;
