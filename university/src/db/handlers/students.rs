//! Database repository for students.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::students::{StudentCreateDBRequest, StudentDBResponse, StudentUpdateDBRequest},
};
use crate::types::{EntityKind, GroupId, StudentId};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Filter for listing students
#[derive(Debug, Clone)]
pub struct StudentFilter {
    pub skip: i64,
    pub limit: i64,
    /// Only members of this group
    pub group_id: Option<GroupId>,
}

impl StudentFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            group_id: None,
        }
    }

    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    fn push_conditions(&self, query: &mut QueryBuilder<'_, Postgres>) {
        if let Some(group_id) = self.group_id {
            query.push(" AND s.group_id = ");
            query.push_bind(group_id);
        }
    }
}

const SELECT_STUDENT: &str = r#"
    SELECT s.id, s.first_name, s.last_name, s.group_id, g.description AS group_description
    FROM students s
    JOIN groups g ON g.id = s.group_id
"#;

pub struct Students<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Students<'c> {
    type CreateRequest = StudentCreateDBRequest;
    type UpdateRequest = StudentUpdateDBRequest;
    type Response = StudentDBResponse;
    type Id = StudentId;
    type Filter = StudentFilter;

    #[instrument(skip(self, request), fields(group_id = request.group_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let student = sqlx::query_as::<_, StudentDBResponse>(
            r#"
            WITH s AS (
                INSERT INTO students (first_name, last_name, group_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT s.id, s.first_name, s.last_name, s.group_id, g.description AS group_description
            FROM s
            JOIN groups g ON g.id = s.group_id
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.group_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(student)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let student = sqlx::query_as::<_, StudentDBResponse>(&format!("{SELECT_STUDENT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(student)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new(SELECT_STUDENT);
        query.push(" WHERE 1=1");
        filter.push_conditions(&mut query);

        query.push(" ORDER BY s.id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let students = query.build_query_as::<StudentDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(students)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let student = sqlx::query_as::<_, StudentDBResponse>(
            r#"
            WITH s AS (
                UPDATE students SET
                    first_name = COALESCE($2, first_name),
                    last_name = COALESCE($3, last_name),
                    group_id = COALESCE($4, group_id)
                WHERE id = $1
                RETURNING *
            )
            SELECT s.id, s.first_name, s.last_name, s.group_id, g.description AS group_description
            FROM s
            JOIN groups g ON g.id = s.group_id
            "#,
        )
        .bind(id)
        .bind(request.first_name.as_deref())
        .bind(request.last_name.as_deref())
        .bind(request.group_id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or_else(|| DbError::not_found(EntityKind::Student, id))?;

        Ok(student)
    }
}

impl<'c> Students<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, filter), err)]
    pub async fn count(&mut self, filter: &StudentFilter) -> Result<i64> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM students s WHERE 1=1");
        filter.push_conditions(&mut query);

        let count: i64 = query.build_query_scalar().fetch_one(&mut *self.db).await?;

        Ok(count)
    }

    /// Move a student into another group
    #[instrument(skip(self), err)]
    pub async fn reassign_group(&mut self, id: StudentId, group_id: GroupId) -> Result<StudentDBResponse> {
        self.update(
            id,
            &StudentUpdateDBRequest {
                group_id: Some(group_id),
                ..Default::default()
            },
        )
        .await
    }
}
