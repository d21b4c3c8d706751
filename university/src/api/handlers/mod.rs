//! HTTP request handlers for all API endpoints.
//!
//! Each handler checks the shape of its path parameters and body, calls the
//! matching service in [`crate::services`] and converts the result into an API model.
//!
//! # Handler Modules
//!
//! - [`courses`]: course CRUD plus teacher and training program associations
//! - [`teachers`]: teacher CRUD plus course associations
//! - [`training_programs`]: training program CRUD plus course associations
//! - [`groups`]: group CRUD, group members, moving a student into a group
//! - [`students`]: student CRUD
//! - [`lecture_halls`]: lecture hall CRUD
//! - [`schedules`]: lesson CRUD and the timetable search

pub mod courses;
pub mod groups;
pub mod lecture_halls;
pub mod schedules;
pub mod students;
pub mod teachers;
pub mod training_programs;
