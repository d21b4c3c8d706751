//! API request/response models for student groups.

use super::validation::{not_blank, when_present};
use crate::db::models::groups::GroupDBResponse;
use crate::errors::Result;
use crate::types::{GroupId, TrainingProgramId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a group. The training program is named by its speciality.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupCreate {
    /// Group description (must be unique)
    #[schema(example = "AM-21")]
    pub description: String,
    /// Speciality of the training program the group follows
    #[schema(example = "Applied Mathematics")]
    pub training_program_speciality: String,
}

impl GroupCreate {
    pub fn validate(&self) -> Result<()> {
        not_blank(&self.description, "Group description should not be blank")?;
        not_blank(&self.training_program_speciality, "Speciality should not be blank")
    }
}

/// Request body for updating a group. Only provided fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GroupUpdate {
    pub description: Option<String>,
    pub training_program_speciality: Option<String>,
}

impl GroupUpdate {
    pub fn validate(&self) -> Result<()> {
        when_present(self.description.as_deref(), |v| not_blank(v, "Group description should not be blank"))?;
        when_present(self.training_program_speciality.as_deref(), |v| {
            not_blank(v, "Speciality should not be blank")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroupResponse {
    pub id: GroupId,
    pub description: String,
    pub training_program_id: TrainingProgramId,
    pub training_program_speciality: String,
}

impl From<GroupDBResponse> for GroupResponse {
    fn from(db: GroupDBResponse) -> Self {
        Self {
            id: db.id,
            description: db.description,
            training_program_id: db.training_program_id,
            training_program_speciality: db.training_program_speciality,
        }
    }
}
