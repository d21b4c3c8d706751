//! Database repository for scheduled lessons, including the multi-criteria search.
//!
//! Every read joins the lesson with its lecture hall, group, teacher and course in one
//! statement, so a [`ScheduleDBResponse`] always arrives fully materialized.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::{
        courses::CourseDBResponse,
        lecture_halls::LectureHallDBResponse,
        schedules::{ScheduleCreateDBRequest, ScheduleCriteria, ScheduleDBResponse, ScheduleGroup, ScheduleUpdateDBRequest},
        teachers::TeacherDBResponse,
    },
};
use crate::types::{CourseId, EntityKind, GroupId, LectureHallId, ScheduleId, TeacherId, TrainingProgramId};
use chrono::{NaiveDate, NaiveTime};
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Filter for listing lessons page by page
#[derive(Debug, Clone)]
pub struct ScheduleFilter {
    pub skip: i64,
    pub limit: i64,
}

impl ScheduleFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

const SELECT_SCHEDULE: &str = r#"
    SELECT
        s.id, s.lesson_date, s.lesson_time,
        lh.id AS lecture_hall_id, lh.housing, lh.floor, lh.number,
        g.id AS group_id, g.description AS group_description, g.training_program_id,
        t.id AS teacher_id, t.first_name AS teacher_first_name, t.last_name AS teacher_last_name,
        c.id AS course_id, c.name AS course_name, c.hours AS course_hours
    FROM schedules s
    JOIN lecture_halls lh ON lh.id = s.lecture_hall_id
    JOIN groups g ON g.id = s.group_id
    JOIN teachers t ON t.id = s.teacher_id
    JOIN courses c ON c.id = s.course_id
"#;

// Flat row as returned by SELECT_SCHEDULE
#[derive(Debug, FromRow)]
struct ScheduleRow {
    id: ScheduleId,
    lesson_date: NaiveDate,
    lesson_time: NaiveTime,
    lecture_hall_id: LectureHallId,
    housing: i32,
    floor: i32,
    number: i32,
    group_id: GroupId,
    group_description: String,
    training_program_id: TrainingProgramId,
    teacher_id: TeacherId,
    teacher_first_name: String,
    teacher_last_name: String,
    course_id: CourseId,
    course_name: String,
    course_hours: i32,
}

impl From<ScheduleRow> for ScheduleDBResponse {
    fn from(row: ScheduleRow) -> Self {
        Self {
            id: row.id,
            lesson_date: row.lesson_date,
            lesson_time: row.lesson_time,
            lecture_hall: LectureHallDBResponse {
                id: row.lecture_hall_id,
                housing: row.housing,
                floor: row.floor,
                number: row.number,
            },
            group: ScheduleGroup {
                id: row.group_id,
                description: row.group_description,
                training_program_id: row.training_program_id,
            },
            teacher: TeacherDBResponse {
                id: row.teacher_id,
                first_name: row.teacher_first_name,
                last_name: row.teacher_last_name,
            },
            course: CourseDBResponse {
                id: row.course_id,
                name: row.course_name,
                hours: row.course_hours,
            },
        }
    }
}

/// Build the search statement: the joined base query plus one `AND` predicate per
/// constrained dimension, ordered by lesson id.
fn search_query(criteria: &ScheduleCriteria) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::new(SELECT_SCHEDULE);
    query.push(" WHERE 1=1");

    if let Some(description) = criteria.group_description.as_deref() {
        query.push(" AND g.description = ");
        query.push_bind(description);
    }
    if let Some(teacher_id) = criteria.teacher_id {
        query.push(" AND t.id = ");
        query.push_bind(teacher_id);
    }
    if let Some(from) = criteria.from {
        query.push(" AND s.lesson_date >= ");
        query.push_bind(from);
    }
    if let Some(to) = criteria.to {
        query.push(" AND s.lesson_date <= ");
        query.push_bind(to);
    }

    query.push(" ORDER BY s.id");
    query
}

pub struct Schedules<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Schedules<'c> {
    type CreateRequest = ScheduleCreateDBRequest;
    type UpdateRequest = ScheduleUpdateDBRequest;
    type Response = ScheduleDBResponse;
    type Id = ScheduleId;
    type Filter = ScheduleFilter;

    #[instrument(skip(self, request), fields(lesson_date = %request.lesson_date), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let id: ScheduleId = sqlx::query_scalar(
            r#"
            INSERT INTO schedules (lesson_date, lesson_time, lecture_hall_id, group_id, teacher_id, course_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(request.lesson_date)
        .bind(request.lesson_time)
        .bind(request.lecture_hall_id)
        .bind(request.group_id)
        .bind(request.teacher_id)
        .bind(request.course_id)
        .fetch_one(&mut *self.db)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::Other(anyhow::anyhow!("inserted schedule {id} is not visible")))
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!("{SELECT_SCHEDULE} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(row.map(ScheduleDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new(SELECT_SCHEDULE);
        query.push(" ORDER BY s.id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let rows = query.build_query_as::<ScheduleRow>().fetch_all(&mut *self.db).await?;

        Ok(rows.into_iter().map(ScheduleDBResponse::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let updated: Option<ScheduleId> = sqlx::query_scalar(
            r#"
            UPDATE schedules SET
                lesson_date = COALESCE($2, lesson_date),
                lesson_time = COALESCE($3, lesson_time),
                lecture_hall_id = COALESCE($4, lecture_hall_id),
                group_id = COALESCE($5, group_id),
                teacher_id = COALESCE($6, teacher_id),
                course_id = COALESCE($7, course_id)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(request.lesson_date)
        .bind(request.lesson_time)
        .bind(request.lecture_hall_id)
        .bind(request.group_id)
        .bind(request.teacher_id)
        .bind(request.course_id)
        .fetch_optional(&mut *self.db)
        .await?;

        if updated.is_none() {
            return Err(DbError::not_found(EntityKind::Schedule, id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::Schedule, id))
    }
}

impl<'c> Schedules<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schedules").fetch_one(&mut *self.db).await?;

        Ok(count)
    }

    /// Every lesson matching all of the given constraints. Unconstrained criteria return
    /// every lesson. The result is not paginated.
    #[instrument(skip(self), err)]
    pub async fn search(&mut self, criteria: &ScheduleCriteria) -> Result<Vec<ScheduleDBResponse>> {
        if criteria.is_unconstrained() {
            tracing::debug!("No schedule constraints given, returning every lesson");
        }

        let mut query = search_query(criteria);
        tracing::debug!("Executing schedule search: {}", query.sql());

        let rows = query.build_query_as::<ScheduleRow>().fetch_all(&mut *self.db).await?;

        tracing::debug!("Schedule search matched {} lessons", rows.len());

        Ok(rows.into_iter().map(ScheduleDBResponse::from).collect())
    }
}
