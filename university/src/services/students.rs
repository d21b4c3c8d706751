use super::Page;
use crate::api::models::students::{StudentCreate, StudentUpdate};
use crate::db::{
    errors::DbError,
    handlers::{students::StudentFilter, EntityStore, Repository, Students},
    models::students::{StudentCreateDBRequest, StudentDBResponse, StudentUpdateDBRequest},
};
use crate::errors::Result;
use crate::types::{EntityKind, StudentId};
use sqlx::PgPool;
use tracing::instrument;

#[derive(Clone)]
pub struct StudentService {
    db: PgPool,
}

impl StudentService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_id(&self, id: StudentId) -> Result<StudentDBResponse> {
        let mut tx = self.db.begin().await?;
        let student = Students::new(&mut tx)
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::Student, id))?;
        tx.commit().await?;

        Ok(student)
    }

    #[instrument(skip(self), err)]
    pub async fn find_all(&self, skip: i64, limit: i64) -> Result<Page<StudentDBResponse>> {
        let filter = StudentFilter::new(skip, limit);
        let mut tx = self.db.begin().await?;
        let mut repo = Students::new(&mut tx);
        let items = repo.list(&filter).await?;
        let total_count = repo.count(&filter).await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    /// Enrol a student in the group with the given description
    #[instrument(skip(self, request), err)]
    pub async fn create(&self, request: &StudentCreate) -> Result<StudentDBResponse> {
        let mut tx = self.db.begin().await?;
        let group_id = EntityStore::new(&mut tx)
            .id_by_natural_key(EntityKind::Group, &request.group_description)
            .await?;

        let student = Students::new(&mut tx)
            .create(&StudentCreateDBRequest {
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                group_id,
            })
            .await?;
        tx.commit().await?;

        Ok(student)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&self, id: StudentId, request: &StudentUpdate) -> Result<StudentDBResponse> {
        let mut tx = self.db.begin().await?;
        let group_id = match request.group_description.as_deref() {
            Some(description) => Some(
                EntityStore::new(&mut tx)
                    .id_by_natural_key(EntityKind::Group, description)
                    .await?,
            ),
            None => None,
        };

        let student = Students::new(&mut tx)
            .update(
                id,
                &StudentUpdateDBRequest {
                    first_name: request.first_name.clone(),
                    last_name: request.last_name.clone(),
                    group_id,
                },
            )
            .await?;
        tx.commit().await?;

        Ok(student)
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: StudentId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        if !Students::new(&mut tx).delete(id).await? {
            return Err(DbError::not_found(EntityKind::Student, id).into());
        }
        tx.commit().await?;

        Ok(())
    }
}
