//! Database repository for courses.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::courses::{CourseCreateDBRequest, CourseDBResponse, CourseUpdateDBRequest},
};
use crate::types::{CourseId, EntityKind, TeacherId, TrainingProgramId};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Filter for listing courses
#[derive(Debug, Clone)]
pub struct CourseFilter {
    pub skip: i64,
    pub limit: i64,
    /// Only courses taught by this teacher
    pub teacher_id: Option<TeacherId>,
    /// Only courses included in this training program
    pub training_program_id: Option<TrainingProgramId>,
}

impl CourseFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            teacher_id: None,
            training_program_id: None,
        }
    }

    pub fn with_teacher(mut self, teacher_id: TeacherId) -> Self {
        self.teacher_id = Some(teacher_id);
        self
    }

    pub fn with_training_program(mut self, training_program_id: TrainingProgramId) -> Self {
        self.training_program_id = Some(training_program_id);
        self
    }

    fn push_conditions(&self, query: &mut QueryBuilder<'_, Postgres>) {
        if let Some(teacher_id) = self.teacher_id {
            query.push(" AND EXISTS (SELECT 1 FROM course_teacher ct WHERE ct.course_id = c.id AND ct.teacher_id = ");
            query.push_bind(teacher_id);
            query.push(")");
        }
        if let Some(training_program_id) = self.training_program_id {
            query.push(
                " AND EXISTS (SELECT 1 FROM course_trainingprogram ctp WHERE ctp.course_id = c.id AND ctp.trainingprogram_id = ",
            );
            query.push_bind(training_program_id);
            query.push(")");
        }
    }
}

pub struct Courses<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Courses<'c> {
    type CreateRequest = CourseCreateDBRequest;
    type UpdateRequest = CourseUpdateDBRequest;
    type Response = CourseDBResponse;
    type Id = CourseId;
    type Filter = CourseFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let course = sqlx::query_as::<_, CourseDBResponse>("INSERT INTO courses (name, hours) VALUES ($1, $2) RETURNING id, name, hours")
            .bind(&request.name)
            .bind(request.hours)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(course)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let course = sqlx::query_as::<_, CourseDBResponse>("SELECT id, name, hours FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(course)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new("SELECT c.id, c.name, c.hours FROM courses c WHERE 1=1");
        filter.push_conditions(&mut query);

        query.push(" ORDER BY c.id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let courses = query.build_query_as::<CourseDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(courses)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let course = sqlx::query_as::<_, CourseDBResponse>(
            r#"
            UPDATE courses SET
                name = COALESCE($2, name),
                hours = COALESCE($3, hours)
            WHERE id = $1
            RETURNING id, name, hours
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.hours)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or_else(|| DbError::not_found(EntityKind::Course, id))?;

        Ok(course)
    }
}

impl<'c> Courses<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, filter), err)]
    pub async fn count(&mut self, filter: &CourseFilter) -> Result<i64> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM courses c WHERE 1=1");
        filter.push_conditions(&mut query);

        let count: i64 = query.build_query_scalar().fetch_one(&mut *self.db).await?;

        Ok(count)
    }

    /// Look a course up by its unique name
    #[instrument(skip(self), err)]
    pub async fn get_by_name(&mut self, name: &str) -> Result<Option<CourseDBResponse>> {
        let course = sqlx::query_as::<_, CourseDBResponse>("SELECT id, name, hours FROM courses WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(course)
    }
}
