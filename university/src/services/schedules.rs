//! Lessons and the schedule search.
//!
//! The search takes the raw filter map from the query string. Only `groupDescription`,
//! `teacherId`, `from` and `to` are recognized; any other key is ignored, and a key that
//! is absent means the same as a key whose value is empty.

use super::Page;
use crate::api::models::schedules::{lesson_in_future, ScheduleCreate, ScheduleUpdate};
use crate::db::{
    errors::DbError,
    handlers::{schedules::ScheduleFilter, EntityStore, Repository, Schedules},
    models::schedules::{ScheduleCreateDBRequest, ScheduleCriteria, ScheduleDBResponse, ScheduleUpdateDBRequest},
};
use crate::errors::{Error, Result};
use crate::types::{EntityKind, ScheduleId};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::instrument;

pub const GROUP_DESCRIPTION: &str = "groupDescription";
pub const TEACHER_ID: &str = "teacherId";
pub const FROM: &str = "from";
pub const TO: &str = "to";

const DATE_FORMAT: &str = "%Y-%m-%d";

impl ScheduleCriteria {
    /// Parse the sparse filter map into typed constraints
    pub fn from_filters(filters: &HashMap<String, String>) -> Result<Self> {
        Ok(Self {
            group_description: present(filters, GROUP_DESCRIPTION).map(str::to_string),
            teacher_id: present(filters, TEACHER_ID)
                .map(|value| parse_value(TEACHER_ID, value, "expected an integer id", i32::from_str))
                .transpose()?,
            from: present(filters, FROM)
                .map(|value| parse_value(FROM, value, "expected a date as YYYY-MM-DD", parse_date))
                .transpose()?,
            to: present(filters, TO)
                .map(|value| parse_value(TO, value, "expected a date as YYYY-MM-DD", parse_date))
                .transpose()?,
        })
    }
}

fn present<'a>(filters: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    filters.get(key).map(String::as_str).filter(|value| !value.is_empty())
}

/// Strict `YYYY-MM-DD`: chrono alone accepts unpadded fields, a sign and leading spaces
fn parse_date(value: &str) -> std::result::Result<NaiveDate, ()> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .filter(|date| date.format(DATE_FORMAT).to_string() == value)
        .ok_or(())
}

fn parse_value<T, E>(
    parameter: &str,
    value: &str,
    reason: &str,
    parse: impl FnOnce(&str) -> std::result::Result<T, E>,
) -> Result<T> {
    parse(value).map_err(|_| Error::InvalidArgument {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    })
}

#[derive(Clone)]
pub struct ScheduleService {
    db: PgPool,
}

impl ScheduleService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_id(&self, id: ScheduleId) -> Result<ScheduleDBResponse> {
        let mut tx = self.db.begin().await?;
        let lesson = Schedules::new(&mut tx)
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::Schedule, id))?;
        tx.commit().await?;

        Ok(lesson)
    }

    #[instrument(skip(self), err)]
    pub async fn find_all(&self, skip: i64, limit: i64) -> Result<Page<ScheduleDBResponse>> {
        let mut tx = self.db.begin().await?;
        let mut repo = Schedules::new(&mut tx);
        let items = repo.list(&ScheduleFilter::new(skip, limit)).await?;
        let total_count = repo.count().await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    /// Schedule a lesson. References are resolved in order: group by description,
    /// course by name, teacher by id, lecture hall by id.
    #[instrument(skip(self, request), fields(lesson_date = %request.lesson_date), err)]
    pub async fn create(&self, request: &ScheduleCreate) -> Result<ScheduleDBResponse> {
        let mut tx = self.db.begin().await?;
        let mut store = EntityStore::new(&mut tx);
        let group_id = store.id_by_natural_key(EntityKind::Group, &request.group_description).await?;
        let course_id = store.id_by_natural_key(EntityKind::Course, &request.course_name).await?;
        store.require(EntityKind::Teacher, request.teacher_id).await?;
        store.require(EntityKind::LectureHall, request.lecture_hall_id).await?;

        let db_request = ScheduleCreateDBRequest::builder()
            .lesson_date(request.lesson_date)
            .lesson_time(request.lesson_time)
            .lecture_hall_id(request.lecture_hall_id)
            .group_id(group_id)
            .teacher_id(request.teacher_id)
            .course_id(course_id)
            .build();

        let lesson = Schedules::new(&mut tx).create(&db_request).await?;
        tx.commit().await?;

        Ok(lesson)
    }

    /// Partial update; references that are present are resolved as in [`Self::create`].
    /// When the date or time changes, the merged date and time must lie after `now`.
    #[instrument(skip(self, request), err)]
    pub async fn update(&self, id: ScheduleId, request: &ScheduleUpdate, now: NaiveDateTime) -> Result<ScheduleDBResponse> {
        let mut tx = self.db.begin().await?;

        if request.changes_timing() {
            let stored = Schedules::new(&mut tx)
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::not_found(EntityKind::Schedule, id))?;
            lesson_in_future(
                request.lesson_date.unwrap_or(stored.lesson_date),
                request.lesson_time.unwrap_or(stored.lesson_time),
                now,
            )?;
        }

        let mut store = EntityStore::new(&mut tx);

        let group_id = match request.group_description.as_deref() {
            Some(description) => Some(store.id_by_natural_key(EntityKind::Group, description).await?),
            None => None,
        };
        let course_id = match request.course_name.as_deref() {
            Some(name) => Some(store.id_by_natural_key(EntityKind::Course, name).await?),
            None => None,
        };
        if let Some(teacher_id) = request.teacher_id {
            store.require(EntityKind::Teacher, teacher_id).await?;
        }
        if let Some(lecture_hall_id) = request.lecture_hall_id {
            store.require(EntityKind::LectureHall, lecture_hall_id).await?;
        }

        let lesson = Schedules::new(&mut tx)
            .update(
                id,
                &ScheduleUpdateDBRequest {
                    lesson_date: request.lesson_date,
                    lesson_time: request.lesson_time,
                    lecture_hall_id: request.lecture_hall_id,
                    group_id,
                    teacher_id: request.teacher_id,
                    course_id,
                },
            )
            .await?;
        tx.commit().await?;

        Ok(lesson)
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: ScheduleId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        if !Schedules::new(&mut tx).delete(id).await? {
            return Err(DbError::not_found(EntityKind::Schedule, id).into());
        }
        tx.commit().await?;

        Ok(())
    }

    /// Every lesson matching all non-empty filters, unpaginated
    #[instrument(skip(self), err)]
    pub async fn search(&self, filters: &HashMap<String, String>) -> Result<Vec<ScheduleDBResponse>> {
        let criteria = ScheduleCriteria::from_filters(filters)?;

        let mut tx = self.db.begin().await?;
        let lessons = Schedules::new(&mut tx).search(&criteria).await?;
        tx.commit().await?;

        Ok(lessons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::schedules::LESSON_IN_PAST;
    use crate::test_utils::{seed_timetable, Timetable};
    use chrono::NaiveTime;

    fn filters(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn ids(lessons: &[ScheduleDBResponse]) -> Vec<ScheduleId> {
        lessons.iter().map(|s| s.id).collect()
    }

    fn all_ids(timetable: &Timetable) -> Vec<ScheduleId> {
        ids(&timetable.schedules)
    }

    /// Noon on the day of the second seeded lesson
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 2, 2).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_and_empty_are_the_same() {
        let empty = ScheduleCriteria::from_filters(&HashMap::new()).unwrap();
        let blanks =
            ScheduleCriteria::from_filters(&filters(&[(GROUP_DESCRIPTION, ""), (TEACHER_ID, ""), (FROM, ""), (TO, "")]))
                .unwrap();

        assert!(empty.is_unconstrained());
        assert_eq!(empty, blanks);
    }

    #[test]
    fn test_parses_each_dimension() {
        let criteria = ScheduleCriteria::from_filters(&filters(&[
            (GROUP_DESCRIPTION, "group_1"),
            (TEACHER_ID, "4"),
            (FROM, "2021-02-06"),
            ("unknown", "ignored"),
        ]))
        .unwrap();

        assert_eq!(
            criteria,
            ScheduleCriteria {
                group_description: Some("group_1".to_string()),
                teacher_id: Some(4),
                from: NaiveDate::from_ymd_opt(2021, 2, 6),
                to: None,
            }
        );
    }

    #[test]
    fn test_unparseable_values_are_invalid_arguments() {
        let err = ScheduleCriteria::from_filters(&filters(&[(TEACHER_ID, "four")])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { ref parameter, .. } if parameter == TEACHER_ID));

        let err = ScheduleCriteria::from_filters(&filters(&[(TO, "06/02/2021")])).unwrap_err();
        assert_eq!(
            err.user_message(),
            "Invalid value '06/02/2021' for to: expected a date as YYYY-MM-DD"
        );

        for loose in ["2020-2-2", "+2020-02-02", " 2020-02-02", "2020-02-02 "] {
            let err = ScheduleCriteria::from_filters(&filters(&[(FROM, loose)])).unwrap_err();
            assert!(
                matches!(err, Error::InvalidArgument { ref parameter, ref value, .. } if parameter == FROM && value == loose),
                "{loose:?} should be rejected"
            );
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_empty_filters_return_every_lesson(pool: PgPool) {
        let timetable = seed_timetable(&pool).await;
        let service = ScheduleService::new(pool.clone());

        let from_empty_map = service.search(&HashMap::new()).await.unwrap();
        let from_blank_values = service
            .search(&filters(&[(GROUP_DESCRIPTION, ""), (TEACHER_ID, ""), (FROM, ""), (TO, "")]))
            .await
            .unwrap();

        assert_eq!(from_empty_map, from_blank_values);
        assert_eq!(ids(&from_empty_map), all_ids(&timetable));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_by_filter_map(pool: PgPool) {
        let timetable = seed_timetable(&pool).await;
        let service = ScheduleService::new(pool.clone());
        let [s1, s2, s3] = [0, 1, 2].map(|i| timetable.schedules[i].id);

        let found = service.search(&filters(&[(FROM, "2020-02-01")])).await.unwrap();
        assert_eq!(ids(&found), vec![s2, s3]);

        let found = service.search(&filters(&[(TO, "2020-02-06")])).await.unwrap();
        assert_eq!(ids(&found), vec![s1, s2]);

        let found = service
            .search(&filters(&[(FROM, "2020-02-02"), (TO, "2020-02-02")]))
            .await
            .unwrap();
        assert_eq!(ids(&found), vec![s2]);

        let found = service.search(&filters(&[(GROUP_DESCRIPTION, "group_2")])).await.unwrap();
        assert_eq!(ids(&found), vec![s2]);

        let teacher_1 = timetable.teachers[0].id.to_string();
        let found = service.search(&filters(&[(TEACHER_ID, &teacher_1)])).await.unwrap();
        assert_eq!(ids(&found), vec![s1]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_resolves_references_in_order(pool: PgPool) {
        let timetable = seed_timetable(&pool).await;
        let service = ScheduleService::new(pool.clone());

        let request = ScheduleCreate {
            lesson_date: NaiveDate::from_ymd_opt(2030, 9, 1).unwrap(),
            lesson_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            lecture_hall_id: timetable.lecture_halls[0].id,
            group_description: "group_3".to_string(),
            teacher_id: timetable.teachers[1].id,
            course_name: "course_1".to_string(),
        };
        let lesson = service.create(&request).await.unwrap();
        assert_eq!(lesson.group.description, "group_3");
        assert_eq!(lesson.course.name, "course_1");
        assert_eq!(lesson.teacher, timetable.teachers[1]);

        // Group is resolved before the course
        let err = service
            .create(&ScheduleCreate {
                group_description: "group_9".to_string(),
                course_name: "course_9".to_string(),
                ..request.clone()
            })
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Group group_9 not found");

        let err = service
            .create(&ScheduleCreate {
                teacher_id: 99,
                lecture_hall_id: 98,
                ..request.clone()
            })
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Teacher with id 99 not found");

        let err = service
            .create(&ScheduleCreate {
                lecture_hall_id: 98,
                ..request
            })
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "LectureHall with id 98 not found");

        assert_eq!(service.find_all(0, 10).await.unwrap().total_count, 4);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_and_delete(pool: PgPool) {
        let timetable = seed_timetable(&pool).await;
        let service = ScheduleService::new(pool.clone());
        let lesson = &timetable.schedules[0];

        let updated = service
            .update(
                lesson.id,
                &ScheduleUpdate {
                    course_name: Some("course_3".to_string()),
                    ..Default::default()
                },
                now(),
            )
            .await
            .unwrap();
        assert_eq!(updated.course, timetable.courses[2]);
        assert_eq!(updated.group, lesson.group);

        service.delete(lesson.id).await.unwrap();
        let err = service.find_by_id(lesson.id).await.unwrap_err();
        assert!(matches!(err, Error::Database(DbError::NotFound { .. })));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_checks_merged_date_and_time(pool: PgPool) {
        let timetable = seed_timetable(&pool).await;
        let service = ScheduleService::new(pool.clone());
        // 2020-02-02 02:02, earlier on the same day as now()
        let today = &timetable.schedules[1];

        let same_day = ScheduleUpdate {
            lesson_date: Some(today.lesson_date),
            ..Default::default()
        };
        let err = service.update(today.id, &same_day, now()).await.unwrap_err();
        assert_eq!(err.user_message(), LESSON_IN_PAST);

        let earlier = ScheduleUpdate {
            lesson_time: NaiveTime::from_hms_opt(11, 59, 0),
            ..Default::default()
        };
        let err = service.update(today.id, &earlier, now()).await.unwrap_err();
        assert_eq!(err.user_message(), LESSON_IN_PAST);
        assert_eq!(service.find_by_id(today.id).await.unwrap().lesson_time, today.lesson_time);

        let later = ScheduleUpdate {
            lesson_time: NaiveTime::from_hms_opt(13, 0, 0),
            ..Default::default()
        };
        let moved = service.update(today.id, &later, now()).await.unwrap();
        assert_eq!(moved.lesson_date, today.lesson_date);
        assert_eq!(moved.lesson_time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());

        let err = service.update(999, &later, now()).await.unwrap_err();
        assert!(matches!(err, Error::Database(DbError::NotFound { .. })));
    }
}
