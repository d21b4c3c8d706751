//! API request/response models for lecture halls.

use super::validation::{positive, when_present};
use crate::db::models::lecture_halls::{LectureHallCreateDBRequest, LectureHallDBResponse, LectureHallUpdateDBRequest};
use crate::errors::Result;
use crate::types::LectureHallId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LectureHallCreate {
    #[schema(example = 1)]
    pub housing: i32,
    #[schema(example = 2)]
    pub floor: i32,
    #[schema(example = 214)]
    pub number: i32,
}

impl LectureHallCreate {
    pub fn validate(&self) -> Result<()> {
        positive(self.housing, "Housing should be positive")?;
        positive(self.floor, "Floor should be positive")?;
        positive(self.number, "Number should be positive")
    }
}

impl From<LectureHallCreate> for LectureHallCreateDBRequest {
    fn from(create: LectureHallCreate) -> Self {
        Self {
            housing: create.housing,
            floor: create.floor,
            number: create.number,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LectureHallUpdate {
    pub housing: Option<i32>,
    pub floor: Option<i32>,
    pub number: Option<i32>,
}

impl LectureHallUpdate {
    pub fn validate(&self) -> Result<()> {
        when_present(self.housing.as_ref(), |v| positive(*v, "Housing should be positive"))?;
        when_present(self.floor.as_ref(), |v| positive(*v, "Floor should be positive"))?;
        when_present(self.number.as_ref(), |v| positive(*v, "Number should be positive"))
    }
}

impl From<LectureHallUpdate> for LectureHallUpdateDBRequest {
    fn from(update: LectureHallUpdate) -> Self {
        Self {
            housing: update.housing,
            floor: update.floor,
            number: update.number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LectureHallResponse {
    pub id: LectureHallId,
    pub housing: i32,
    pub floor: i32,
    pub number: i32,
}

impl From<LectureHallDBResponse> for LectureHallResponse {
    fn from(db: LectureHallDBResponse) -> Self {
        Self {
            id: db.id,
            housing: db.housing,
            floor: db.floor,
            number: db.number,
        }
    }
}
