//! Database models for lecture halls.

use crate::types::LectureHallId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct LectureHallCreateDBRequest {
    pub housing: i32,
    pub floor: i32,
    pub number: i32,
}

#[derive(Debug, Clone, Default)]
pub struct LectureHallUpdateDBRequest {
    pub housing: Option<i32>,
    pub floor: Option<i32>,
    pub number: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LectureHallDBResponse {
    pub id: LectureHallId,
    pub housing: i32,
    pub floor: i32,
    pub number: i32,
}
