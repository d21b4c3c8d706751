//! API request/response models for training programs.

use super::validation::{not_blank, when_present};
use crate::db::models::training_programs::{TrainingProgramCreateDBRequest, TrainingProgramDBResponse, TrainingProgramUpdateDBRequest};
use crate::errors::Result;
use crate::types::TrainingProgramId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrainingProgramCreate {
    /// Speciality taught by the program (must be unique)
    #[schema(example = "Applied Mathematics")]
    pub speciality: String,
}

impl TrainingProgramCreate {
    pub fn validate(&self) -> Result<()> {
        not_blank(&self.speciality, "TrainingProgram speciality should not be blank")
    }
}

impl From<TrainingProgramCreate> for TrainingProgramCreateDBRequest {
    fn from(create: TrainingProgramCreate) -> Self {
        Self {
            speciality: create.speciality,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TrainingProgramUpdate {
    pub speciality: Option<String>,
}

impl TrainingProgramUpdate {
    pub fn validate(&self) -> Result<()> {
        when_present(self.speciality.as_deref(), |v| {
            not_blank(v, "TrainingProgram speciality should not be blank")
        })
    }
}

impl From<TrainingProgramUpdate> for TrainingProgramUpdateDBRequest {
    fn from(update: TrainingProgramUpdate) -> Self {
        Self {
            speciality: update.speciality,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrainingProgramResponse {
    pub id: TrainingProgramId,
    pub speciality: String,
}

impl From<TrainingProgramDBResponse> for TrainingProgramResponse {
    fn from(db: TrainingProgramDBResponse) -> Self {
        Self {
            id: db.id,
            speciality: db.speciality,
        }
    }
}
