//! Repository implementations for database access.
//!
//! This module provides a repository struct for each stored entity, plus the two
//! kind-generic pieces built on top of them.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed CRUD operations via the [`Repository`] trait
//! - Lists rows page by page, ordered by id, with an optional anchor in its filter
//!   (e.g. the courses of one teacher)
//! - Returns models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Courses`], [`Teachers`], [`TrainingPrograms`]
//! - [`Groups`], [`Students`]
//! - [`LectureHalls`]
//! - [`Schedules`]: lessons, always joined with their four references, and the
//!   multi-criteria search
//!
//! # Kind-generic helpers
//!
//! - [`EntityStore`]: existence checks and natural-key resolution for any [`crate::types::EntityKind`]
//! - [`Associations`]: add/remove of rows in the two many-to-many join tables

pub mod associations;
pub mod courses;
pub mod groups;
pub mod lecture_halls;
pub mod repository;
pub mod schedules;
pub mod store;
pub mod students;
pub mod teachers;
pub mod training_programs;

pub use associations::Associations;
pub use courses::Courses;
pub use groups::Groups;
pub use lecture_halls::LectureHalls;
pub use repository::Repository;
pub use schedules::Schedules;
pub use store::EntityStore;
pub use students::Students;
pub use teachers::Teachers;
pub use training_programs::TrainingPrograms;
