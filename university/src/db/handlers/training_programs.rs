//! Database repository for training programs.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::training_programs::{TrainingProgramCreateDBRequest, TrainingProgramDBResponse, TrainingProgramUpdateDBRequest},
};
use crate::types::{CourseId, EntityKind, TrainingProgramId};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Filter for listing training programs
#[derive(Debug, Clone)]
pub struct TrainingProgramFilter {
    pub skip: i64,
    pub limit: i64,
    /// Only programs that include this course
    pub course_id: Option<CourseId>,
}

impl TrainingProgramFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            course_id: None,
        }
    }

    pub fn with_course(mut self, course_id: CourseId) -> Self {
        self.course_id = Some(course_id);
        self
    }

    fn push_conditions(&self, query: &mut QueryBuilder<'_, Postgres>) {
        if let Some(course_id) = self.course_id {
            query.push(
                " AND EXISTS (SELECT 1 FROM course_trainingprogram ctp WHERE ctp.trainingprogram_id = tp.id AND ctp.course_id = ",
            );
            query.push_bind(course_id);
            query.push(")");
        }
    }
}

pub struct TrainingPrograms<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for TrainingPrograms<'c> {
    type CreateRequest = TrainingProgramCreateDBRequest;
    type UpdateRequest = TrainingProgramUpdateDBRequest;
    type Response = TrainingProgramDBResponse;
    type Id = TrainingProgramId;
    type Filter = TrainingProgramFilter;

    #[instrument(skip(self, request), fields(speciality = %request.speciality), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let program = sqlx::query_as::<_, TrainingProgramDBResponse>(
            "INSERT INTO training_programs (speciality) VALUES ($1) RETURNING id, speciality",
        )
        .bind(&request.speciality)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(program)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let program = sqlx::query_as::<_, TrainingProgramDBResponse>("SELECT id, speciality FROM training_programs WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(program)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new("SELECT tp.id, tp.speciality FROM training_programs tp WHERE 1=1");
        filter.push_conditions(&mut query);

        query.push(" ORDER BY tp.id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let programs = query
            .build_query_as::<TrainingProgramDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;

        Ok(programs)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM training_programs WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let program = sqlx::query_as::<_, TrainingProgramDBResponse>(
            "UPDATE training_programs SET speciality = COALESCE($2, speciality) WHERE id = $1 RETURNING id, speciality",
        )
        .bind(id)
        .bind(request.speciality.as_deref())
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or_else(|| DbError::not_found(EntityKind::TrainingProgram, id))?;

        Ok(program)
    }
}

impl<'c> TrainingPrograms<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, filter), err)]
    pub async fn count(&mut self, filter: &TrainingProgramFilter) -> Result<i64> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM training_programs tp WHERE 1=1");
        filter.push_conditions(&mut query);

        let count: i64 = query.build_query_scalar().fetch_one(&mut *self.db).await?;

        Ok(count)
    }

    /// Look a program up by its unique speciality
    #[instrument(skip(self), err)]
    pub async fn get_by_speciality(&mut self, speciality: &str) -> Result<Option<TrainingProgramDBResponse>> {
        let program =
            sqlx::query_as::<_, TrainingProgramDBResponse>("SELECT id, speciality FROM training_programs WHERE speciality = $1")
                .bind(speciality)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::associations::{Associations, CourseTrainingProgram};
    use crate::test_utils::{create_test_course, create_test_group, create_test_training_program};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_by_speciality(pool: PgPool) {
        let program = create_test_training_program(&pool, "Physics").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = TrainingPrograms::new(&mut conn);

        assert_eq!(repo.get_by_speciality("Physics").await.unwrap(), Some(program));
        assert!(repo.get_by_speciality("physics").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_programs_including_course(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let p1 = create_test_training_program(&pool, "trainingProgram_1").await;
        let p2 = create_test_training_program(&pool, "trainingProgram_2").await;

        let mut conn = pool.acquire().await.unwrap();
        Associations::<CourseTrainingProgram>::new(&mut conn)
            .add(course.id, p2.id)
            .await
            .unwrap();

        let mut repo = TrainingPrograms::new(&mut conn);
        let filter = TrainingProgramFilter::new(0, 10).with_course(course.id);
        assert_eq!(repo.list(&filter).await.unwrap(), vec![p2]);
        assert_eq!(repo.list(&TrainingProgramFilter::new(0, 1)).await.unwrap(), vec![p1]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_referenced_program_is_rejected(pool: PgPool) {
        let program = create_test_training_program(&pool, "trainingProgram_1").await;
        create_test_group(&pool, "group_1", program.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let err = TrainingPrograms::new(&mut conn).delete(program.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
