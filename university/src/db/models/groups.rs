//! Database models for student groups.

use crate::types::{GroupId, TrainingProgramId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database request for creating a new group. Every group belongs to a training program.
#[derive(Debug, Clone)]
pub struct GroupCreateDBRequest {
    pub description: String,
    pub training_program_id: TrainingProgramId,
}

/// Database request for updating a group
#[derive(Debug, Clone, Default)]
pub struct GroupUpdateDBRequest {
    pub description: Option<String>,
    pub training_program_id: Option<TrainingProgramId>,
}

/// Database response for a group, with its training program joined in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GroupDBResponse {
    pub id: GroupId,
    pub description: String,
    pub training_program_id: TrainingProgramId,
    pub training_program_speciality: String,
}
