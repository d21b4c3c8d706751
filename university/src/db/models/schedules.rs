//! Database models for scheduled lessons and the schedule search criteria.

use crate::db::models::{courses::CourseDBResponse, lecture_halls::LectureHallDBResponse, teachers::TeacherDBResponse};
use crate::types::{CourseId, GroupId, LectureHallId, ScheduleId, TeacherId, TrainingProgramId};
use bon::Builder;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Database request for creating a lesson. All four references are required.
#[derive(Debug, Clone, Builder)]
pub struct ScheduleCreateDBRequest {
    pub lesson_date: NaiveDate,
    pub lesson_time: NaiveTime,
    pub lecture_hall_id: LectureHallId,
    pub group_id: GroupId,
    pub teacher_id: TeacherId,
    pub course_id: CourseId,
}

/// Database request for updating a lesson
#[derive(Debug, Clone, Default)]
pub struct ScheduleUpdateDBRequest {
    pub lesson_date: Option<NaiveDate>,
    pub lesson_time: Option<NaiveTime>,
    pub lecture_hall_id: Option<LectureHallId>,
    pub group_id: Option<GroupId>,
    pub teacher_id: Option<TeacherId>,
    pub course_id: Option<CourseId>,
}

/// The group a lesson is held for, as loaded alongside the lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleGroup {
    pub id: GroupId,
    pub description: String,
    pub training_program_id: TrainingProgramId,
}

/// A lesson with all four of its references materialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDBResponse {
    pub id: ScheduleId,
    pub lesson_date: NaiveDate,
    pub lesson_time: NaiveTime,
    pub lecture_hall: LectureHallDBResponse,
    pub group: ScheduleGroup,
    pub teacher: TeacherDBResponse,
    pub course: CourseDBResponse,
}

/// Typed constraints for the schedule search. `None` leaves a dimension unconstrained;
/// `from` and `to` are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleCriteria {
    pub group_description: Option<String>,
    pub teacher_id: Option<TeacherId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ScheduleCriteria {
    pub fn is_unconstrained(&self) -> bool {
        self == &Self::default()
    }
}
