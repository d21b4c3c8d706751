//! API request/response models for students.

use super::validation::{not_blank, when_present};
use crate::db::models::students::StudentDBResponse;
use crate::errors::Result;
use crate::types::{GroupId, StudentId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for enrolling a student. The group is named by its description.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentCreate {
    #[schema(example = "Alan")]
    pub first_name: String,
    #[schema(example = "Turing")]
    pub last_name: String,
    #[schema(example = "AM-21")]
    pub group_description: String,
}

impl StudentCreate {
    pub fn validate(&self) -> Result<()> {
        not_blank(&self.first_name, "FirstName should not be blank")?;
        not_blank(&self.last_name, "LastName should not be blank")?;
        not_blank(&self.group_description, "Group description should not be blank")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub group_description: Option<String>,
}

impl StudentUpdate {
    pub fn validate(&self) -> Result<()> {
        when_present(self.first_name.as_deref(), |v| not_blank(v, "FirstName should not be blank"))?;
        when_present(self.last_name.as_deref(), |v| not_blank(v, "LastName should not be blank"))?;
        when_present(self.group_description.as_deref(), |v| {
            not_blank(v, "Group description should not be blank")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub group_id: GroupId,
    pub group_description: String,
}

impl From<StudentDBResponse> for StudentResponse {
    fn from(db: StudentDBResponse) -> Self {
        Self {
            id: db.id,
            first_name: db.first_name,
            last_name: db.last_name,
            group_id: db.group_id,
            group_description: db.group_description,
        }
    }
}
