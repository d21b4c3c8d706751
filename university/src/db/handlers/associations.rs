//! Many-to-many association mutations.
//!
//! There are exactly two association tables, `course_teacher` and `course_trainingprogram`.
//! Each is described by a zero-sized type implementing [`Association`], and both share one
//! algorithm in [`Associations`]:
//!
//! 1. the left endpoint must exist, else `NotFound(left kind, left id)`;
//! 2. the right endpoint must exist, else `NotFound(right kind, right id)`;
//! 3. a single conditional write touches the join row, and its affected-row count decides
//!    the outcome: nothing inserted means `AlreadyExists`, nothing deleted means `NotExists`.
//!
//! The join table is never probed before the write, so two concurrent adds of the same pair
//! cannot both succeed. [`Inverse`] flips an association so that the teacher or training
//! program side is checked first when the operation starts from that side.

use crate::db::{
    errors::{DbError, Result},
    handlers::store::EntityStore,
};
use crate::types::EntityKind;
use sqlx::PgConnection;
use std::marker::PhantomData;
use tracing::instrument;

/// One side of an association: which kind it points at and the join column holding its id.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub kind: EntityKind,
    pub column: &'static str,
}

/// A many-to-many association table with a left and right endpoint.
pub trait Association: Send + Sync + 'static {
    const TABLE: &'static str;
    const LEFT: Endpoint;
    const RIGHT: Endpoint;
}

/// Courses taught by teachers.
pub struct CourseTeacher;

impl Association for CourseTeacher {
    const TABLE: &'static str = "course_teacher";
    const LEFT: Endpoint = Endpoint {
        kind: EntityKind::Course,
        column: "course_id",
    };
    const RIGHT: Endpoint = Endpoint {
        kind: EntityKind::Teacher,
        column: "teacher_id",
    };
}

/// Courses included in training programs.
pub struct CourseTrainingProgram;

impl Association for CourseTrainingProgram {
    const TABLE: &'static str = "course_trainingprogram";
    const LEFT: Endpoint = Endpoint {
        kind: EntityKind::Course,
        column: "course_id",
    };
    const RIGHT: Endpoint = Endpoint {
        kind: EntityKind::TrainingProgram,
        column: "trainingprogram_id",
    };
}

/// The same join table seen from the other side.
pub struct Inverse<A>(PhantomData<A>);

impl<A: Association> Association for Inverse<A> {
    const TABLE: &'static str = A::TABLE;
    const LEFT: Endpoint = A::RIGHT;
    const RIGHT: Endpoint = A::LEFT;
}

pub type TeacherCourse = Inverse<CourseTeacher>;
pub type TrainingProgramCourse = Inverse<CourseTrainingProgram>;

pub struct Associations<'c, A: Association> {
    db: &'c mut PgConnection,
    _association: PhantomData<A>,
}

impl<'c, A: Association> Associations<'c, A> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self {
            db,
            _association: PhantomData,
        }
    }

    /// Link `left_id` to `right_id`.
    #[instrument(skip(self), fields(table = A::TABLE), err)]
    pub async fn add(&mut self, left_id: i32, right_id: i32) -> Result<()> {
        self.require_endpoints(left_id, right_id).await?;
        self.insert_pair(left_id, right_id).await
    }

    /// Link `left_id` to the right-hand entity identified by its natural key
    /// (a course name or a training program speciality).
    #[instrument(skip(self), fields(table = A::TABLE), err)]
    pub async fn add_by_natural_key(&mut self, left_id: i32, right_key: &str) -> Result<()> {
        let mut store = EntityStore::new(&mut *self.db);
        store.require(A::LEFT.kind, left_id).await?;
        let right_id = store.id_by_natural_key(A::RIGHT.kind, right_key).await?;

        self.insert_pair(left_id, right_id).await
    }

    /// Unlink `left_id` from `right_id`.
    #[instrument(skip(self), fields(table = A::TABLE), err)]
    pub async fn remove(&mut self, left_id: i32, right_id: i32) -> Result<()> {
        self.require_endpoints(left_id, right_id).await?;

        let sql = format!(
            "DELETE FROM {} WHERE {} = $1 AND {} = $2",
            A::TABLE,
            A::LEFT.column,
            A::RIGHT.column
        );
        let result = sqlx::query(&sql).bind(left_id).bind(right_id).execute(&mut *self.db).await?;

        if result.rows_affected() > 0 {
            Ok(())
        } else {
            Err(DbError::NotExists {
                left: A::LEFT.kind,
                left_id,
                right: A::RIGHT.kind,
                right_id,
            })
        }
    }

    async fn require_endpoints(&mut self, left_id: i32, right_id: i32) -> Result<()> {
        let mut store = EntityStore::new(&mut *self.db);
        store.require(A::LEFT.kind, left_id).await?;
        store.require(A::RIGHT.kind, right_id).await
    }

    async fn insert_pair(&mut self, left_id: i32, right_id: i32) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            A::TABLE,
            A::LEFT.column,
            A::RIGHT.column
        );
        let result = sqlx::query(&sql).bind(left_id).bind(right_id).execute(&mut *self.db).await?;

        if result.rows_affected() > 0 {
            Ok(())
        } else {
            Err(DbError::AlreadyExists {
                left: A::LEFT.kind,
                left_id,
                right: A::RIGHT.kind,
                right_id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_course, create_test_teacher, create_test_training_program};
    use crate::types::{CourseId, EntityKey, TeacherId};
    use sqlx::{Acquire, PgPool};

    async fn pair_count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_add_twice_fails_with_already_exists(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let teacher = create_test_teacher(&pool, "teacher_1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut links = Associations::<CourseTeacher>::new(&mut conn);

        links.add(course.id, teacher.id).await.expect("first add should succeed");
        let err = links.add(course.id, teacher.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::AlreadyExists {
                left: EntityKind::Course,
                right: EntityKind::Teacher,
                ..
            }
        ));

        assert_eq!(pair_count(&pool, "course_teacher").await, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_missing_left_endpoint_is_reported_first(pool: PgPool) {
        let teacher = create_test_teacher(&pool, "teacher_1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut links = Associations::<CourseTeacher>::new(&mut conn);

        // Right endpoint exists
        let err = links.add(404, teacher.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                entity: EntityKind::Course,
                key: EntityKey::Id(404)
            }
        ));

        // Right endpoint also missing: still the left one is reported
        let err = links.remove(404, 405).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                entity: EntityKind::Course,
                key: EntityKey::Id(404)
            }
        ));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_remove_succeeds_once(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let program = create_test_training_program(&pool, "trainingProgram_1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut links = Associations::<CourseTrainingProgram>::new(&mut conn);

        links.add(course.id, program.id).await.unwrap();
        links.remove(course.id, program.id).await.expect("remove after add should succeed");

        let err = links.remove(course.id, program.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotExists {
                left: EntityKind::Course,
                right: EntityKind::TrainingProgram,
                ..
            }
        ));
        assert_eq!(pair_count(&pool, "course_trainingprogram").await, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_inverse_checks_its_own_side_first(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut links = Associations::<TeacherCourse>::new(&mut conn);

        let err = links.add(77, course.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                entity: EntityKind::Teacher,
                key: EntityKey::Id(77)
            }
        ));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_both_orientations_share_the_join_table(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let teacher = create_test_teacher(&pool, "teacher_1").await;

        let mut conn = pool.acquire().await.unwrap();
        Associations::<TeacherCourse>::new(&mut conn)
            .add(teacher.id, course.id)
            .await
            .unwrap();

        let err = Associations::<CourseTeacher>::new(&mut conn)
            .add(course.id, teacher.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::AlreadyExists { .. }));

        Associations::<CourseTeacher>::new(&mut conn)
            .remove(course.id, teacher.id)
            .await
            .unwrap();
        let err = Associations::<TeacherCourse>::new(&mut conn)
            .remove(teacher.id, course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotExists { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_add_by_natural_key(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let program = create_test_training_program(&pool, "trainingProgram_1").await;

        let mut conn = pool.acquire().await.unwrap();

        Associations::<TrainingProgramCourse>::new(&mut conn)
            .add_by_natural_key(program.id, "course_1")
            .await
            .unwrap();

        let err = Associations::<CourseTrainingProgram>::new(&mut conn)
            .add_by_natural_key(course.id, "trainingProgram_1")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::AlreadyExists { .. }));

        let err = Associations::<CourseTrainingProgram>::new(&mut conn)
            .add_by_natural_key(course.id, "no_such_speciality")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "TrainingProgram no_such_speciality not found");

        // The anchor is checked before the natural key is resolved
        let err = Associations::<CourseTrainingProgram>::new(&mut conn)
            .add_by_natural_key(999, "no_such_speciality")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Course with id 999 not found");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_rolled_back_add_leaves_no_row(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let teacher = create_test_teacher(&pool, "teacher_1").await;

        {
            let mut tx = pool.begin().await.unwrap();
            Associations::<CourseTeacher>::new(tx.acquire().await.unwrap())
                .add(course.id, teacher.id)
                .await
                .unwrap();
            // dropped without commit
        }

        assert_eq!(pair_count(&pool, "course_teacher").await, 0);
    }

    async fn add_in_own_transaction(pool: &PgPool, course_id: CourseId, teacher_id: TeacherId) -> Result<()> {
        let mut tx = pool.begin().await.unwrap();
        let result = Associations::<CourseTeacher>::new(&mut tx).add(course_id, teacher_id).await;
        tx.commit().await.unwrap();
        result
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_concurrent_adds_of_same_pair(pool: PgPool) {
        let course = create_test_course(&pool, "course_1").await;
        let teacher = create_test_teacher(&pool, "teacher_1").await;

        let (a, b) = tokio::join!(
            add_in_own_transaction(&pool, course.id, teacher.id),
            add_in_own_transaction(&pool, course.id, teacher.id),
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1, "{outcomes:?}");
        assert!(
            outcomes.iter().any(|r| matches!(r, Err(DbError::AlreadyExists { left_id, right_id, .. })
                if *left_id == course.id && *right_id == teacher.id)),
            "{outcomes:?}"
        );
        assert_eq!(pair_count(&pool, "course_teacher").await, 1);
    }
}
