use super::Page;
use crate::db::{
    errors::DbError,
    handlers::{
        associations::TeacherCourse, courses::CourseFilter, teachers::TeacherFilter, Associations, Courses, EntityStore,
        Repository, Teachers,
    },
    models::{
        courses::CourseDBResponse,
        teachers::{TeacherCreateDBRequest, TeacherDBResponse, TeacherUpdateDBRequest},
    },
};
use crate::errors::Result;
use crate::types::{CourseId, EntityKind, TeacherId};
use sqlx::PgPool;
use tracing::instrument;

#[derive(Clone)]
pub struct TeacherService {
    db: PgPool,
}

impl TeacherService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_id(&self, id: TeacherId) -> Result<TeacherDBResponse> {
        let mut tx = self.db.begin().await?;
        let teacher = Teachers::new(&mut tx)
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::Teacher, id))?;
        tx.commit().await?;

        Ok(teacher)
    }

    #[instrument(skip(self), err)]
    pub async fn find_all(&self, skip: i64, limit: i64) -> Result<Page<TeacherDBResponse>> {
        let filter = TeacherFilter::new(skip, limit);
        let mut tx = self.db.begin().await?;
        let mut repo = Teachers::new(&mut tx);
        let items = repo.list(&filter).await?;
        let total_count = repo.count(&filter).await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    #[instrument(skip(self, request), err)]
    pub async fn create(&self, request: &TeacherCreateDBRequest) -> Result<TeacherDBResponse> {
        let mut tx = self.db.begin().await?;
        let teacher = Teachers::new(&mut tx).create(request).await?;
        tx.commit().await?;

        Ok(teacher)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&self, id: TeacherId, request: &TeacherUpdateDBRequest) -> Result<TeacherDBResponse> {
        let mut tx = self.db.begin().await?;
        let teacher = Teachers::new(&mut tx).update(id, request).await?;
        tx.commit().await?;

        Ok(teacher)
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: TeacherId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        if !Teachers::new(&mut tx).delete(id).await? {
            return Err(DbError::not_found(EntityKind::Teacher, id).into());
        }
        tx.commit().await?;

        Ok(())
    }

    /// Courses taught by a teacher, one page at a time
    #[instrument(skip(self), err)]
    pub async fn courses(&self, id: TeacherId, skip: i64, limit: i64) -> Result<Page<CourseDBResponse>> {
        let mut tx = self.db.begin().await?;
        EntityStore::new(&mut tx).require(EntityKind::Teacher, id).await?;

        let filter = CourseFilter::new(skip, limit).with_teacher(id);
        let mut repo = Courses::new(&mut tx);
        let items = repo.list(&filter).await?;
        let total_count = repo.count(&filter).await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    #[instrument(skip(self), err)]
    pub async fn add_course(&self, teacher_id: TeacherId, course_id: CourseId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<TeacherCourse>::new(&mut tx).add(teacher_id, course_id).await?;
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn add_course_by_name(&self, teacher_id: TeacherId, course_name: &str) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<TeacherCourse>::new(&mut tx)
            .add_by_natural_key(teacher_id, course_name)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn remove_course(&self, teacher_id: TeacherId, course_id: CourseId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        Associations::<TeacherCourse>::new(&mut tx).remove(teacher_id, course_id).await?;
        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{create_test_course, create_test_teacher};
    use crate::types::EntityKey;

    #[sqlx::test]
    #[test_log::test]
    async fn test_teacher_side_checks_teacher_first(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let service = TeacherService::new(pool.clone());

        // Both ends are absent; the teacher side is checked first
        let err = service.add_course(42, course.id + 1).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DbError::NotFound {
                entity: EntityKind::Teacher,
                key: EntityKey::Id(42)
            })
        ));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_courses_of_teacher(pool: PgPool) {
        let c1 = create_test_course(&pool, "course_1").await;
        let c2 = create_test_course(&pool, "course_2").await;
        let _c3 = create_test_course(&pool, "course_3").await;
        let teacher = create_test_teacher(&pool, "teacher_1").await;

        let service = TeacherService::new(pool.clone());
        service.add_course(teacher.id, c1.id).await.unwrap();
        service.add_course_by_name(teacher.id, "course_2").await.unwrap();

        let err = service.add_course_by_name(teacher.id, "course_2").await.unwrap_err();
        assert!(matches!(err, Error::Database(DbError::AlreadyExists { .. })));

        let err = service.add_course_by_name(teacher.id, "missing").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DbError::NotFound {
                entity: EntityKind::Course,
                ..
            })
        ));

        let page = service.courses(teacher.id, 0, 10).await.unwrap();
        assert_eq!(page.items, vec![c1.clone(), c2]);
        assert_eq!(page.total_count, 2);

        service.remove_course(teacher.id, c1.id).await.unwrap();
        assert_eq!(service.courses(teacher.id, 0, 10).await.unwrap().total_count, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_deleting_teacher_drops_links(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let teacher = create_test_teacher(&pool, "teacher_1").await;

        let service = TeacherService::new(pool.clone());
        service.add_course(teacher.id, course.id).await.unwrap();
        service.delete(teacher.id).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_teacher")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
