use super::Page;
use crate::db::{
    errors::DbError,
    handlers::{
        associations::{CourseTeacher, CourseTrainingProgram},
        courses::CourseFilter,
        teachers::TeacherFilter,
        training_programs::TrainingProgramFilter,
        Associations, Courses, EntityStore, Repository, Teachers, TrainingPrograms,
    },
    models::{
        courses::{CourseCreateDBRequest, CourseDBResponse, CourseUpdateDBRequest},
        teachers::TeacherDBResponse,
        training_programs::TrainingProgramDBResponse,
    },
};
use crate::errors::Result;
use crate::types::{CourseId, EntityKey, EntityKind, TeacherId, TrainingProgramId};
use sqlx::PgPool;
use tracing::instrument;

#[derive(Clone)]
pub struct CourseService {
    db: PgPool,
}

impl CourseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_id(&self, id: CourseId) -> Result<CourseDBResponse> {
        let mut tx = self.db.begin().await?;
        let course = Courses::new(&mut tx)
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::Course, id))?;
        tx.commit().await?;

        Ok(course)
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_name(&self, name: &str) -> Result<CourseDBResponse> {
        let mut tx = self.db.begin().await?;
        let course = Courses::new(&mut tx)
            .get_by_name(name)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::Course, EntityKey::from(name)))?;
        tx.commit().await?;

        Ok(course)
    }

    #[instrument(skip(self), err)]
    pub async fn find_all(&self, skip: i64, limit: i64) -> Result<Page<CourseDBResponse>> {
        let filter = CourseFilter::new(skip, limit);
        let mut tx = self.db.begin().await?;
        let mut repo = Courses::new(&mut tx);
        let items = repo.list(&filter).await?;
        let total_count = repo.count(&filter).await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    #[instrument(skip(self, request), err)]
    pub async fn create(&self, request: &CourseCreateDBRequest) -> Result<CourseDBResponse> {
        let mut tx = self.db.begin().await?;
        let course = Courses::new(&mut tx).create(request).await?;
        tx.commit().await?;

        Ok(course)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&self, id: CourseId, request: &CourseUpdateDBRequest) -> Result<CourseDBResponse> {
        let mut tx = self.db.begin().await?;
        let course = Courses::new(&mut tx).update(id, request).await?;
        tx.commit().await?;

        Ok(course)
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: CourseId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        if !Courses::new(&mut tx).delete(id).await? {
            return Err(DbError::not_found(EntityKind::Course, id).into());
        }
        tx.commit().await?;

        Ok(())
    }

    /// Teachers of a course, one page at a time
    #[instrument(skip(self), err)]
    pub async fn teachers(&self, id: CourseId, skip: i64, limit: i64) -> Result<Page<TeacherDBResponse>> {
        let mut tx = self.db.begin().await?;
        EntityStore::new(&mut tx).require(EntityKind::Course, id).await?;

        let filter = TeacherFilter::new(skip, limit).with_course(id);
        let mut repo = Teachers::new(&mut tx);
        let items = repo.list(&filter).await?;
        let total_count = repo.count(&filter).await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    #[instrument(skip(self), err)]
    pub async fn add_teacher(&self, course_id: CourseId, teacher_id: TeacherId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<CourseTeacher>::new(&mut tx).add(course_id, teacher_id).await?;
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn remove_teacher(&self, course_id: CourseId, teacher_id: TeacherId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<CourseTeacher>::new(&mut tx).remove(course_id, teacher_id).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Training programs that include a course, one page at a time
    #[instrument(skip(self), err)]
    pub async fn training_programs(
        &self,
        id: CourseId,
        skip: i64,
        limit: i64,
    ) -> Result<Page<TrainingProgramDBResponse>> {
        let mut tx = self.db.begin().await?;
        EntityStore::new(&mut tx).require(EntityKind::Course, id).await?;

        let filter = TrainingProgramFilter::new(skip, limit).with_course(id);
        let mut repo = TrainingPrograms::new(&mut tx);
        let items = repo.list(&filter).await?;
        let total_count = repo.count(&filter).await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    #[instrument(skip(self), err)]
    pub async fn add_training_program(&self, course_id: CourseId, program_id: TrainingProgramId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<CourseTrainingProgram>::new(&mut tx).add(course_id, program_id).await?;
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn add_training_program_by_speciality(&self, course_id: CourseId, speciality: &str) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<CourseTrainingProgram>::new(&mut tx)
            .add_by_natural_key(course_id, speciality)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn remove_training_program(&self, course_id: CourseId, program_id: TrainingProgramId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<CourseTrainingProgram>::new(&mut tx)
            .remove(course_id, program_id)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
