//! Database models for training programs.

use crate::types::TrainingProgramId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct TrainingProgramCreateDBRequest {
    pub speciality: String,
}

#[derive(Debug, Clone, Default)]
pub struct TrainingProgramUpdateDBRequest {
    pub speciality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TrainingProgramDBResponse {
    pub id: TrainingProgramId,
    pub speciality: String,
}
