//! Database models for courses.

use crate::types::CourseId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database request for creating a new course
#[derive(Debug, Clone)]
pub struct CourseCreateDBRequest {
    pub name: String,
    pub hours: i32,
}

/// Database request for updating a course
#[derive(Debug, Clone, Default)]
pub struct CourseUpdateDBRequest {
    pub name: Option<String>,
    pub hours: Option<i32>,
}

/// Database response for a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CourseDBResponse {
    pub id: CourseId,
    pub name: String,
    pub hours: i32,
}
