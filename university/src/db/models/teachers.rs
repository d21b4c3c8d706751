//! Database models for teachers.

use crate::types::TeacherId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct TeacherCreateDBRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TeacherUpdateDBRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TeacherDBResponse {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
}
