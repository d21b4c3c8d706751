//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for every endpoint
//! - **[`models`]**: Request/response data structures and their input checks
//!
//! # API Structure
//!
//! Everything is served under `/api`:
//!
//! - **Courses** (`/api/courses/*`): courses, their teachers and training programs
//! - **Teachers** (`/api/teachers/*`): teachers and the courses they teach
//! - **Training programs** (`/api/training-programs/*`): programs and their courses
//! - **Groups** (`/api/groups/*`): groups and their students
//! - **Students** (`/api/students/*`)
//! - **Lecture halls** (`/api/lecture-halls/*`)
//! - **Schedules** (`/api/schedules/*`): the timetable and its search
//!
//! The OpenAPI document and its UI are served at `/docs`.

pub mod handlers;
pub mod models;
