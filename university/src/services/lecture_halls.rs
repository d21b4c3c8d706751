use super::Page;
use crate::db::{
    errors::DbError,
    handlers::{lecture_halls::LectureHallFilter, LectureHalls, Repository},
    models::lecture_halls::{LectureHallCreateDBRequest, LectureHallDBResponse, LectureHallUpdateDBRequest},
};
use crate::errors::Result;
use crate::types::{EntityKind, LectureHallId};
use sqlx::PgPool;
use tracing::instrument;

#[derive(Clone)]
pub struct LectureHallService {
    db: PgPool,
}

impl LectureHallService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_id(&self, id: LectureHallId) -> Result<LectureHallDBResponse> {
        let mut tx = self.db.begin().await?;
        let hall = LectureHalls::new(&mut tx)
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::LectureHall, id))?;
        tx.commit().await?;

        Ok(hall)
    }

    #[instrument(skip(self), err)]
    pub async fn find_all(&self, skip: i64, limit: i64) -> Result<Page<LectureHallDBResponse>> {
        let mut tx = self.db.begin().await?;
        let mut repo = LectureHalls::new(&mut tx);
        let items = repo.list(&LectureHallFilter::new(skip, limit)).await?;
        let total_count = repo.count().await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    #[instrument(skip(self, request), err)]
    pub async fn create(&self, request: &LectureHallCreateDBRequest) -> Result<LectureHallDBResponse> {
        let mut tx = self.db.begin().await?;
        let hall = LectureHalls::new(&mut tx).create(request).await?;
        tx.commit().await?;

        Ok(hall)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&self, id: LectureHallId, request: &LectureHallUpdateDBRequest) -> Result<LectureHallDBResponse> {
        let mut tx = self.db.begin().await?;
        let hall = LectureHalls::new(&mut tx).update(id, request).await?;
        tx.commit().await?;

        Ok(hall)
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: LectureHallId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        if !LectureHalls::new(&mut tx).delete(id).await? {
            return Err(DbError::not_found(EntityKind::LectureHall, id).into());
        }
        tx.commit().await?;

        Ok(())
    }
}
