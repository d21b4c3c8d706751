//! Database repository for teachers.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::teachers::{TeacherCreateDBRequest, TeacherDBResponse, TeacherUpdateDBRequest},
};
use crate::types::{CourseId, EntityKind, TeacherId};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Filter for listing teachers
#[derive(Debug, Clone)]
pub struct TeacherFilter {
    pub skip: i64,
    pub limit: i64,
    /// Only teachers of this course
    pub course_id: Option<CourseId>,
}

impl TeacherFilter {
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
            query.push(" AND EXISTS (SELECT 1 FROM course_teacher ct WHERE ct.teacher_id = t.id AND ct.course_id = ");
            query.push_bind(course_id);
            query.push(")");
        }
    }
}

pub struct Teachers<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Teachers<'c> {
    type CreateRequest = TeacherCreateDBRequest;
    type UpdateRequest = TeacherUpdateDBRequest;
    type Response = TeacherDBResponse;
    type Id = TeacherId;
    type Filter = TeacherFilter;

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let teacher = sqlx::query_as::<_, TeacherDBResponse>(
            "INSERT INTO teachers (first_name, last_name) VALUES ($1, $2) RETURNING id, first_name, last_name",
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(teacher)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let teacher = sqlx::query_as::<_, TeacherDBResponse>("SELECT id, first_name, last_name FROM teachers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(teacher)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new("SELECT t.id, t.first_name, t.last_name FROM teachers t WHERE 1=1");
        filter.push_conditions(&mut query);

        query.push(" ORDER BY t.id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let teachers = query.build_query_as::<TeacherDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(teachers)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let teacher = sqlx::query_as::<_, TeacherDBResponse>(
            r#"
            UPDATE teachers SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name)
            WHERE id = $1
            RETURNING id, first_name, last_name
            "#,
        )
        .bind(id)
        .bind(request.first_name.as_deref())
        .bind(request.last_name.as_deref())
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or_else(|| DbError::not_found(EntityKind::Teacher, id))?;

        Ok(teacher)
    }
}

impl<'c> Teachers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, filter), err)]
    pub async fn count(&mut self, filter: &TeacherFilter) -> Result<i64> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM teachers t WHERE 1=1");
        filter.push_conditions(&mut query);

        let count: i64 = query.build_query_scalar().fetch_one(&mut *self.db).await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::associations::{Associations, TeacherCourse};
    use crate::test_utils::{create_test_course, create_test_teacher};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_update_teacher(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Teachers::new(&mut conn);

        let teacher = repo
            .create(&TeacherCreateDBRequest {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                teacher.id,
                &TeacherUpdateDBRequest {
                    first_name: None,
                    last_name: Some("Murray Hopper".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Grace");
        assert_eq!(updated.last_name, "Murray Hopper");

        assert_eq!(repo.get_by_id(teacher.id).await.unwrap(), Some(updated));
        assert!(repo.get_by_id(teacher.id + 100).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_teachers_of_course(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let t1 = create_test_teacher(&pool, "teacher_1").await;
        let _t2 = create_test_teacher(&pool, "teacher_2").await;
        let t3 = create_test_teacher(&pool, "teacher_3").await;

        let mut conn = pool.acquire().await.unwrap();
        for teacher in [&t1, &t3] {
            Associations::<TeacherCourse>::new(&mut conn)
                .add(teacher.id, course.id)
                .await
                .unwrap();
        }

        let mut repo = Teachers::new(&mut conn);
        let filter = TeacherFilter::new(0, 10).with_course(course.id);
        assert_eq!(repo.list(&filter).await.unwrap(), vec![t1, t3]);
        assert_eq!(repo.count(&filter).await.unwrap(), 2);
        assert_eq!(repo.count(&TeacherFilter::new(0, 10)).await.unwrap(), 3);
    }
}
