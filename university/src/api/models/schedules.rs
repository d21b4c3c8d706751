//! API request/response models for scheduled lessons.

use super::{
    courses::CourseResponse,
    lecture_halls::LectureHallResponse,
    teachers::TeacherResponse,
    validation::{not_blank, positive, when_present},
};
use crate::db::models::schedules::{ScheduleDBResponse, ScheduleGroup};
use crate::errors::{Error, Result};
use crate::types::{GroupId, LectureHallId, ScheduleId, TeacherId, TrainingProgramId};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const LESSON_IN_PAST: &str = "The specified date and time have already passed";

/// Request body for scheduling a lesson. The group and course are named by their
/// natural keys; the teacher and lecture hall by id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleCreate {
    #[schema(value_type = String, format = Date, example = "2030-09-01")]
    pub lesson_date: NaiveDate,
    #[schema(value_type = String, example = "09:30:00")]
    pub lesson_time: NaiveTime,
    pub lecture_hall_id: LectureHallId,
    #[schema(example = "AM-21")]
    pub group_description: String,
    pub teacher_id: TeacherId,
    #[schema(example = "Linear Algebra")]
    pub course_name: String,
}

impl ScheduleCreate {
    /// Shape checks, plus the rule that a new lesson must lie after `now`.
    pub fn validate(&self, now: NaiveDateTime) -> Result<()> {
        positive(self.lecture_hall_id, "LectureHall id should be positive")?;
        not_blank(&self.group_description, "Group description should not be blank")?;
        positive(self.teacher_id, "Teacher id should be positive")?;
        not_blank(&self.course_name, "Course name should not be blank")?;
        lesson_in_future(self.lesson_date, self.lesson_time, now)
    }
}

/// Request body for updating a lesson. Only provided fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ScheduleUpdate {
    #[schema(value_type = Option<String>, format = Date)]
    pub lesson_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub lesson_time: Option<NaiveTime>,
    pub lecture_hall_id: Option<LectureHallId>,
    pub group_description: Option<String>,
    pub teacher_id: Option<TeacherId>,
    pub course_name: Option<String>,
}

impl ScheduleUpdate {
    /// Shape checks only. Whether the lesson still lies in the future depends on the
    /// stored date and time, so [`crate::services::ScheduleService::update`] checks that.
    pub fn validate(&self) -> Result<()> {
        when_present(self.lecture_hall_id.as_ref(), |v| positive(*v, "LectureHall id should be positive"))?;
        when_present(self.group_description.as_deref(), |v| {
            not_blank(v, "Group description should not be blank")
        })?;
        when_present(self.teacher_id.as_ref(), |v| positive(*v, "Teacher id should be positive"))?;
        when_present(self.course_name.as_deref(), |v| not_blank(v, "Course name should not be blank"))
    }

    /// True when the request moves the lesson in time
    pub fn changes_timing(&self) -> bool {
        self.lesson_date.is_some() || self.lesson_time.is_some()
    }
}

/// A lesson dated before today is rejected; a lesson dated today must start after `now`.
pub fn lesson_in_future(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> Result<()> {
    if date.and_time(time) <= now {
        return Err(Error::bad_request(LESSON_IN_PAST));
    }
    Ok(())
}

/// The group a lesson is held for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleGroupResponse {
    pub id: GroupId,
    pub description: String,
    pub training_program_id: TrainingProgramId,
}

impl From<ScheduleGroup> for ScheduleGroupResponse {
    fn from(group: ScheduleGroup) -> Self {
        Self {
            id: group.id,
            description: group.description,
            training_program_id: group.training_program_id,
        }
    }
}

/// A lesson with its lecture hall, group, teacher and course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleResponse {
    pub id: ScheduleId,
    #[schema(value_type = String, format = Date)]
    pub lesson_date: NaiveDate,
    #[schema(value_type = String)]
    pub lesson_time: NaiveTime,
    pub lecture_hall: LectureHallResponse,
    pub group: ScheduleGroupResponse,
    pub teacher: TeacherResponse,
    pub course: CourseResponse,
}

impl From<ScheduleDBResponse> for ScheduleResponse {
    fn from(db: ScheduleDBResponse) -> Self {
        Self {
            id: db.id,
            lesson_date: db.lesson_date,
            lesson_time: db.lesson_time,
            lecture_hall: db.lecture_hall.into(),
            group: db.group.into(),
            teacher: db.teacher.into(),
            course: db.course.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M").unwrap())
    }

    fn lesson(date: &str, time: &str) -> ScheduleCreate {
        ScheduleCreate {
            lesson_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            lesson_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            lecture_hall_id: 1,
            group_description: "group_1".to_string(),
            teacher_id: 1,
            course_name: "course_1".to_string(),
        }
    }

    #[test]
    fn test_lesson_must_be_in_future() {
        let now = at("2025-06-15", "12:00");

        assert!(lesson("2025-06-16", "08:00").validate(now).is_ok());
        assert!(lesson("2025-06-15", "12:30").validate(now).is_ok());

        for (date, time) in [("2025-06-14", "23:00"), ("2025-06-15", "12:00"), ("2025-06-15", "09:00")] {
            let err = lesson(date, time).validate(now).unwrap_err();
            assert_eq!(err.user_message(), LESSON_IN_PAST, "{date} {time}");
        }
    }

    #[test]
    fn test_update_checks_only_present_fields() {
        assert!(ScheduleUpdate::default().validate().is_ok());
        assert!(!ScheduleUpdate::default().changes_timing());

        let time_only = ScheduleUpdate {
            lesson_time: NaiveTime::from_hms_opt(1, 0, 0),
            ..Default::default()
        };
        assert!(time_only.validate().is_ok());
        assert!(time_only.changes_timing());

        let bad_teacher = ScheduleUpdate {
            teacher_id: Some(0),
            ..Default::default()
        };
        assert_eq!(bad_teacher.validate().unwrap_err().user_message(), "Teacher id should be positive");
    }

    #[test]
    fn test_create_shape_checks() {
        let now = at("2025-06-15", "12:00");
        let mut blank_course = lesson("2026-01-01", "10:00");
        blank_course.course_name = String::new();
        assert_eq!(blank_course.validate(now).unwrap_err().user_message(), "Course name should not be blank");
    }
}
