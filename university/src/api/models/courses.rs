//! API request/response models for courses.

use super::validation::{not_blank, positive, when_present};
use crate::db::models::courses::{CourseCreateDBRequest, CourseDBResponse, CourseUpdateDBRequest};
use crate::errors::Result;
use crate::types::CourseId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a new course.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseCreate {
    /// Course name (must be unique)
    #[schema(example = "Linear Algebra")]
    pub name: String,
    /// Number of teaching hours
    #[schema(example = 72)]
    pub hours: i32,
}

impl CourseCreate {
    pub fn validate(&self) -> Result<()> {
        not_blank(&self.name, "Course name should not be blank")?;
        positive(self.hours, "Hours should be positive")
    }
}

impl From<CourseCreate> for CourseCreateDBRequest {
    fn from(create: CourseCreate) -> Self {
        Self {
            name: create.name,
            hours: create.hours,
        }
    }
}

/// Request body for updating a course. Only provided fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CourseUpdate {
    pub name: Option<String>,
    pub hours: Option<i32>,
}

impl CourseUpdate {
    pub fn validate(&self) -> Result<()> {
        when_present(self.name.as_deref(), |name| not_blank(name, "Course name should not be blank"))?;
        when_present(self.hours.as_ref(), |hours| positive(*hours, "Hours should be positive"))
    }
}

impl From<CourseUpdate> for CourseUpdateDBRequest {
    fn from(update: CourseUpdate) -> Self {
        Self {
            name: update.name,
            hours: update.hours,
        }
    }
}

/// Course details returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CourseResponse {
    pub id: CourseId,
    pub name: String,
    pub hours: i32,
}

impl From<CourseDBResponse> for CourseResponse {
    fn from(db: CourseDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            hours: db.hours,
        }
    }
}
