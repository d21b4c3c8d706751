//! Database repository for student groups.
//!
//! Groups are always read together with the speciality of their training program.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::groups::{GroupCreateDBRequest, GroupDBResponse, GroupUpdateDBRequest},
};
use crate::types::{EntityKind, GroupId};
use sqlx::{PgConnection, QueryBuilder};
use tracing::instrument;

/// Filter for listing groups
#[derive(Debug, Clone)]
pub struct GroupFilter {
    pub skip: i64,
    pub limit: i64,
}

impl GroupFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

const SELECT_GROUP: &str = r#"
    SELECT g.id, g.description, g.training_program_id, tp.speciality AS training_program_speciality
    FROM groups g
    JOIN training_programs tp ON tp.id = g.training_program_id
"#;

pub struct Groups<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Groups<'c> {
    type CreateRequest = GroupCreateDBRequest;
    type UpdateRequest = GroupUpdateDBRequest;
    type Response = GroupDBResponse;
    type Id = GroupId;
    type Filter = GroupFilter;

    #[instrument(skip(self, request), fields(description = %request.description), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let group = sqlx::query_as::<_, GroupDBResponse>(
            r#"
            WITH g AS (
                INSERT INTO groups (description, training_program_id)
                VALUES ($1, $2)
                RETURNING *
            )
            SELECT g.id, g.description, g.training_program_id, tp.speciality AS training_program_speciality
            FROM g
            JOIN training_programs tp ON tp.id = g.training_program_id
            "#,
        )
        .bind(&request.description)
        .bind(request.training_program_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(group)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let group = sqlx::query_as::<_, GroupDBResponse>(&format!("{SELECT_GROUP} WHERE g.id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(group)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new(SELECT_GROUP);

        query.push(" ORDER BY g.id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let groups = query.build_query_as::<GroupDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(groups)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let group = sqlx::query_as::<_, GroupDBResponse>(
            r#"
            WITH g AS (
                UPDATE groups SET
                    description = COALESCE($2, description),
                    training_program_id = COALESCE($3, training_program_id)
                WHERE id = $1
                RETURNING *
            )
            SELECT g.id, g.description, g.training_program_id, tp.speciality AS training_program_speciality
            FROM g
            JOIN training_programs tp ON tp.id = g.training_program_id
            "#,
        )
        .bind(id)
        .bind(request.description.as_deref())
        .bind(request.training_program_id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or_else(|| DbError::not_found(EntityKind::Group, id))?;

        Ok(group)
    }
}

impl<'c> Groups<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM groups").fetch_one(&mut *self.db).await?;

        Ok(count)
    }

    /// Look a group up by its unique description
    #[instrument(skip(self), err)]
    pub async fn get_by_description(&mut self, description: &str) -> Result<Option<GroupDBResponse>> {
        let group = sqlx::query_as::<_, GroupDBResponse>(&format!("{SELECT_GROUP} WHERE g.description = $1"))
            .bind(description)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(group)
    }
}
