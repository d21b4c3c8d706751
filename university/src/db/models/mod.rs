//! Database record models matching table schemas.
//!
//! Each entity has a `*DBResponse` row type plus the create/update requests its
//! repository accepts. Database models are kept distinct from the API models in
//! [`crate::api::models`], which convert from them.
//!
//! References to other entities are always carried by id here; resolving a
//! natural key (a group description, a course name) to an id is the job of the
//! services before a request reaches a repository.

pub mod courses;
pub mod groups;
pub mod lecture_halls;
pub mod schedules;
pub mod students;
pub mod teachers;
pub mod training_programs;
