use super::Page;
use crate::db::{
    errors::DbError,
    handlers::{
        associations::TrainingProgramCourse, courses::CourseFilter, training_programs::TrainingProgramFilter,
        Associations, Courses, EntityStore, Repository, TrainingPrograms,
    },
    models::{
        courses::CourseDBResponse,
        training_programs::{TrainingProgramCreateDBRequest, TrainingProgramDBResponse, TrainingProgramUpdateDBRequest},
    },
};
use crate::errors::Result;
use crate::types::{CourseId, EntityKey, EntityKind, TrainingProgramId};
use sqlx::PgPool;
use tracing::instrument;

#[derive(Clone)]
pub struct TrainingProgramService {
    db: PgPool,
}

impl TrainingProgramService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_id(&self, id: TrainingProgramId) -> Result<TrainingProgramDBResponse> {
        let mut tx = self.db.begin().await?;
        let program = TrainingPrograms::new(&mut tx)
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::TrainingProgram, id))?;
        tx.commit().await?;

        Ok(program)
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_speciality(&self, speciality: &str) -> Result<TrainingProgramDBResponse> {
        let mut tx = self.db.begin().await?;
        let program = TrainingPrograms::new(&mut tx)
            .get_by_speciality(speciality)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::TrainingProgram, EntityKey::from(speciality)))?;
        tx.commit().await?;

        Ok(program)
    }

    #[instrument(skip(self), err)]
    pub async fn find_all(&self, skip: i64, limit: i64) -> Result<Page<TrainingProgramDBResponse>> {
        let filter = TrainingProgramFilter::new(skip, limit);
        let mut tx = self.db.begin().await?;
        let mut repo = TrainingPrograms::new(&mut tx);
        let items = repo.list(&filter).await?;
        let total_count = repo.count(&filter).await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    #[instrument(skip(self, request), err)]
    pub async fn create(&self, request: &TrainingProgramCreateDBRequest) -> Result<TrainingProgramDBResponse> {
        let mut tx = self.db.begin().await?;
        let program = TrainingPrograms::new(&mut tx).create(request).await?;
        tx.commit().await?;

        Ok(program)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(
        &self,
        id: TrainingProgramId,
        request: &TrainingProgramUpdateDBRequest,
    ) -> Result<TrainingProgramDBResponse> {
        let mut tx = self.db.begin().await?;
        let program = TrainingPrograms::new(&mut tx).update(id, request).await?;
        tx.commit().await?;

        Ok(program)
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: TrainingProgramId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        if !TrainingPrograms::new(&mut tx).delete(id).await? {
            return Err(DbError::not_found(EntityKind::TrainingProgram, id).into());
        }
        tx.commit().await?;

        Ok(())
    }

    /// Courses included in a training program, one page at a time
    #[instrument(skip(self), err)]
    pub async fn courses(&self, id: TrainingProgramId, skip: i64, limit: i64) -> Result<Page<CourseDBResponse>> {
        let mut tx = self.db.begin().await?;
        EntityStore::new(&mut tx).require(EntityKind::TrainingProgram, id).await?;

        let filter = CourseFilter::new(skip, limit).with_training_program(id);
        let mut repo = Courses::new(&mut tx);
        let items = repo.list(&filter).await?;
        let total_count = repo.count(&filter).await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    #[instrument(skip(self), err)]
    pub async fn add_course(&self, program_id: TrainingProgramId, course_id: CourseId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<TrainingProgramCourse>::new(&mut tx)
            .add(program_id, course_id)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn add_course_by_name(&self, program_id: TrainingProgramId, course_name: &str) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<TrainingProgramCourse>::new(&mut tx)
            .add_by_natural_key(program_id, course_name)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn remove_course(&self, program_id: TrainingProgramId, course_id: CourseId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<TrainingProgramCourse>::new(&mut tx)
            .remove(program_id, course_id)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
