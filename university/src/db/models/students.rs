//! Database models for students.

use crate::types::{GroupId, StudentId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct StudentCreateDBRequest {
    pub first_name: String,
    pub last_name: String,
    pub group_id: GroupId,
}

#[derive(Debug, Clone, Default)]
pub struct StudentUpdateDBRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub group_id: Option<GroupId>,
}

/// Database response for a student, with the group description joined in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StudentDBResponse {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub group_id: GroupId,
    pub group_description: String,
}
