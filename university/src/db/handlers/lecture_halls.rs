//! Database repository for lecture halls.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::lecture_halls::{LectureHallCreateDBRequest, LectureHallDBResponse, LectureHallUpdateDBRequest},
};
use crate::types::{EntityKind, LectureHallId};
use sqlx::{PgConnection, QueryBuilder};
use tracing::instrument;

/// Filter for listing lecture halls
#[derive(Debug, Clone)]
pub struct LectureHallFilter {
    pub skip: i64,
    pub limit: i64,
}

impl LectureHallFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct LectureHalls<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for LectureHalls<'c> {
    type CreateRequest = LectureHallCreateDBRequest;
    type UpdateRequest = LectureHallUpdateDBRequest;
    type Response = LectureHallDBResponse;
    type Id = LectureHallId;
    type Filter = LectureHallFilter;

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let hall = sqlx::query_as::<_, LectureHallDBResponse>(
            "INSERT INTO lecture_halls (housing, floor, number) VALUES ($1, $2, $3) RETURNING id, housing, floor, number",
        )
        .bind(request.housing)
        .bind(request.floor)
        .bind(request.number)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(hall)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let hall = sqlx::query_as::<_, LectureHallDBResponse>("SELECT id, housing, floor, number FROM lecture_halls WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(hall)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new("SELECT id, housing, floor, number FROM lecture_halls ORDER BY id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let halls = query.build_query_as::<LectureHallDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(halls)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM lecture_halls WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let hall = sqlx::query_as::<_, LectureHallDBResponse>(
            r#"
            UPDATE lecture_halls SET
                housing = COALESCE($2, housing),
                floor = COALESCE($3, floor),
                number = COALESCE($4, number)
            WHERE id = $1
            RETURNING id, housing, floor, number
            "#,
        )
        .bind(id)
        .bind(request.housing)
        .bind(request.floor)
        .bind(request.number)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or_else(|| DbError::not_found(EntityKind::LectureHall, id))?;

        Ok(hall)
    }
}

impl<'c> LectureHalls<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lecture_halls")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_lecture_hall_lifecycle(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = LectureHalls::new(&mut conn);

        let hall = repo
            .create(&LectureHallCreateDBRequest {
                housing: 1,
                floor: 2,
                number: 203,
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                hall.id,
                &LectureHallUpdateDBRequest {
                    number: Some(204),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!((updated.housing, updated.floor, updated.number), (1, 2, 204));
        assert_eq!(repo.count().await.unwrap(), 1);

        assert!(repo.delete(hall.id).await.unwrap());
        assert!(repo.list(&LectureHallFilter::new(0, 10)).await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_coordinates_must_be_positive(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let err = LectureHalls::new(&mut conn)
            .create(&LectureHallCreateDBRequest {
                housing: 1,
                floor: -1,
                number: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }
}
