use super::Page;
use crate::api::models::groups::{GroupCreate, GroupUpdate};
use crate::db::{
    errors::DbError,
    handlers::{groups::GroupFilter, students::StudentFilter, EntityStore, Groups, Repository, Students},
    models::{
        groups::{GroupCreateDBRequest, GroupDBResponse, GroupUpdateDBRequest},
        students::StudentDBResponse,
    },
};
use crate::errors::Result;
use crate::types::{EntityKey, EntityKind, GroupId, StudentId};
use sqlx::PgPool;
use tracing::instrument;

#[derive(Clone)]
pub struct GroupService {
    db: PgPool,
}

impl GroupService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_id(&self, id: GroupId) -> Result<GroupDBResponse> {
        let mut tx = self.db.begin().await?;
        let group = Groups::new(&mut tx)
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::Group, id))?;
        tx.commit().await?;

        Ok(group)
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_description(&self, description: &str) -> Result<GroupDBResponse> {
        let mut tx = self.db.begin().await?;
        let group = Groups::new(&mut tx)
            .get_by_description(description)
            .await?
            .ok_or_else(|| DbError::not_found(EntityKind::Group, EntityKey::from(description)))?;
        tx.commit().await?;

        Ok(group)
    }

    #[instrument(skip(self), err)]
    pub async fn find_all(&self, skip: i64, limit: i64) -> Result<Page<GroupDBResponse>> {
        let mut tx = self.db.begin().await?;
        let mut repo = Groups::new(&mut tx);
        let items = repo.list(&GroupFilter::new(skip, limit)).await?;
        let total_count = repo.count().await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    /// Create a group inside the training program with the given speciality
    #[instrument(skip(self, request), fields(description = %request.description), err)]
    pub async fn create(&self, request: &GroupCreate) -> Result<GroupDBResponse> {
        let mut tx = self.db.begin().await?;
        let training_program_id = EntityStore::new(&mut tx)
            .id_by_natural_key(EntityKind::TrainingProgram, &request.training_program_speciality)
            .await?;

        let group = Groups::new(&mut tx)
            .create(&GroupCreateDBRequest {
                description: request.description.clone(),
                training_program_id,
            })
            .await?;
        tx.commit().await?;

        Ok(group)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&self, id: GroupId, request: &GroupUpdate) -> Result<GroupDBResponse> {
        let mut tx = self.db.begin().await?;
        let training_program_id = match request.training_program_speciality.as_deref() {
            Some(speciality) => Some(
                EntityStore::new(&mut tx)
                    .id_by_natural_key(EntityKind::TrainingProgram, speciality)
                    .await?,
            ),
            None => None,
        };

        let group = Groups::new(&mut tx)
            .update(
                id,
                &GroupUpdateDBRequest {
                    description: request.description.clone(),
                    training_program_id,
                },
            )
            .await?;
        tx.commit().await?;

        Ok(group)
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: GroupId) -> Result<()> {
        let mut tx = self.db.begin().await?;
        if !Groups::new(&mut tx).delete(id).await? {
            return Err(DbError::not_found(EntityKind::Group, id).into());
        }
        tx.commit().await?;

        Ok(())
    }

    /// Members of a group, one page at a time
    #[instrument(skip(self), err)]
    pub async fn students(&self, id: GroupId, skip: i64, limit: i64) -> Result<Page<StudentDBResponse>> {
        let mut tx = self.db.begin().await?;
        EntityStore::new(&mut tx).require(EntityKind::Group, id).await?;

        let filter = StudentFilter::new(skip, limit).with_group(id);
        let mut repo = Students::new(&mut tx);
        let items = repo.list(&filter).await?;
        let total_count = repo.count(&filter).await?;
        tx.commit().await?;

        Ok(Page::new(items, total_count, skip, limit))
    }

    /// Move a student into this group. The group is checked before the student.
    #[instrument(skip(self), err)]
    pub async fn add_student(&self, group_id: GroupId, student_id: StudentId) -> Result<StudentDBResponse> {
        let mut tx = self.db.begin().await?;
        let mut store = EntityStore::new(&mut tx);
        store.require(EntityKind::Group, group_id).await?;
        store.require(EntityKind::Student, student_id).await?;

        let student = Students::new(&mut tx).reassign_group(student_id, group_id).await?;
        tx.commit().await?;

        Ok(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{create_test_group, create_test_student, create_test_training_program};

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_resolves_speciality(pool: PgPool) {
        let program = create_test_training_program(&pool, "trainingProgram_1").await;
        let service = GroupService::new(pool.clone());

        let group = service
            .create(&GroupCreate {
                description: "group_1".to_string(),
                training_program_speciality: "trainingProgram_1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(group.training_program_id, program.id);
        assert_eq!(service.find_by_description("group_1").await.unwrap(), group);

        let err = service
            .create(&GroupCreate {
                description: "group_2".to_string(),
                training_program_speciality: "unknown".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "TrainingProgram unknown not found");
        assert_eq!(service.find_all(0, 10).await.unwrap().total_count, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_moves_group_to_other_program(pool: PgPool) {
        let p1 = create_test_training_program(&pool, "trainingProgram_1").await;
        let p2 = create_test_training_program(&pool, "trainingProgram_2").await;
        let group = create_test_group(&pool, "group_1", p1.id).await;

        let service = GroupService::new(pool.clone());
        let updated = service
            .update(
                group.id,
                &GroupUpdate {
                    training_program_speciality: Some("trainingProgram_2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.training_program_id, p2.id);
        assert_eq!(updated.description, "group_1");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_add_student(pool: PgPool) {
        let program = create_test_training_program(&pool, "trainingProgram_1").await;
        let g1 = create_test_group(&pool, "group_1", program.id).await;
        let g2 = create_test_group(&pool, "group_2", program.id).await;
        let student = create_test_student(&pool, "student_1", g1.id).await;

        let service = GroupService::new(pool.clone());
        let moved = service.add_student(g2.id, student.id).await.unwrap();
        assert_eq!(moved.group_id, g2.id);

        let page = service.students(g2.id, 0, 10).await.unwrap();
        assert_eq!(page.items, vec![moved]);
        assert_eq!(service.students(g1.id, 0, 10).await.unwrap().total_count, 0);

        let err = service.add_student(99, 98).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DbError::NotFound {
                entity: EntityKind::Group,
                ..
            })
        ));

        let err = service.add_student(g1.id, 98).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DbError::NotFound {
                entity: EntityKind::Student,
                ..
            })
        ));
    }
}
