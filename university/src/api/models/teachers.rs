//! API request/response models for teachers.

use super::validation::{not_blank, when_present};
use crate::db::models::teachers::{TeacherCreateDBRequest, TeacherDBResponse, TeacherUpdateDBRequest};
use crate::errors::Result;
use crate::types::TeacherId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a new teacher.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherCreate {
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
}

impl TeacherCreate {
    pub fn validate(&self) -> Result<()> {
        not_blank(&self.first_name, "FirstName should not be blank")?;
        not_blank(&self.last_name, "LastName should not be blank")
    }
}

impl From<TeacherCreate> for TeacherCreateDBRequest {
    fn from(create: TeacherCreate) -> Self {
        Self {
            first_name: create.first_name,
            last_name: create.last_name,
        }
    }
}

/// Request body for updating a teacher. Only provided fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TeacherUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TeacherUpdate {
    pub fn validate(&self) -> Result<()> {
        when_present(self.first_name.as_deref(), |v| not_blank(v, "FirstName should not be blank"))?;
        when_present(self.last_name.as_deref(), |v| not_blank(v, "LastName should not be blank"))
    }
}

impl From<TeacherUpdate> for TeacherUpdateDBRequest {
    fn from(update: TeacherUpdate) -> Self {
        Self {
            first_name: update.first_name,
            last_name: update.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeacherResponse {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
}

impl From<TeacherDBResponse> for TeacherResponse {
    fn from(db: TeacherDBResponse) -> Self {
        Self {
            id: db.id,
            first_name: db.first_name,
            last_name: db.last_name,
        }
    }
}
