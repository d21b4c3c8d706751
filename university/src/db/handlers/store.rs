//! Kind-generic lookups: existence checks and natural-key resolution.
//!
//! Typed reads live on each repository; this covers the questions that can be asked of
//! any kind, which is what the association and facade code needs.

use crate::db::errors::{DbError, Result};
use crate::types::{EntityKind, EntityKey};
use sqlx::PgConnection;
use tracing::instrument;

pub struct EntityStore<'c> {
    db: &'c mut PgConnection,
}

impl<'c> EntityStore<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Whether a row of `kind` with this id exists
    #[instrument(skip(self), err)]
    pub async fn exists(&mut self, kind: EntityKind, id: i32) -> Result<bool> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", kind.table());
        let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(&mut *self.db).await?;
        Ok(exists)
    }

    /// Fail with `NotFound(kind, id)` unless the row exists
    pub async fn require(&mut self, kind: EntityKind, id: i32) -> Result<()> {
        if self.exists(kind, id).await? {
            Ok(())
        } else {
            Err(DbError::not_found(kind, id))
        }
    }

    /// Resolve a natural key (course name, group description, speciality) to an id
    #[instrument(skip(self), err)]
    pub async fn id_by_natural_key(&mut self, kind: EntityKind, key: &str) -> Result<i32> {
        let column = kind
            .natural_key_column()
            .ok_or_else(|| DbError::Other(anyhow::anyhow!("{kind} has no natural key")))?;

        let sql = format!("SELECT id FROM {} WHERE {} = $1", kind.table(), column);
        let id: Option<i32> = sqlx::query_scalar(&sql).bind(key).fetch_optional(&mut *self.db).await?;

        id.ok_or_else(|| DbError::NotFound {
            entity: kind,
            key: EntityKey::from(key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_exists_and_require(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let id: i32 = sqlx::query_scalar("INSERT INTO teachers (first_name, last_name) VALUES ('Ada', 'Lovelace') RETURNING id")
            .fetch_one(&mut *conn)
            .await
            .unwrap();

        let mut store = EntityStore::new(&mut conn);
        assert!(store.exists(EntityKind::Teacher, id).await.unwrap());
        assert!(!store.exists(EntityKind::Teacher, id + 1).await.unwrap());
        assert!(!store.exists(EntityKind::Course, id).await.unwrap());

        store.require(EntityKind::Teacher, id).await.unwrap();
        let err = store.require(EntityKind::Teacher, 99).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                entity: EntityKind::Teacher,
                key: EntityKey::Id(99)
            }
        ));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_id_by_natural_key(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let id: i32 = sqlx::query_scalar("INSERT INTO courses (name, hours) VALUES ('course_1', 10) RETURNING id")
            .fetch_one(&mut *conn)
            .await
            .unwrap();

        let mut store = EntityStore::new(&mut conn);
        assert_eq!(store.id_by_natural_key(EntityKind::Course, "course_1").await.unwrap(), id);

        // Case-sensitive exact match
        let err = store.id_by_natural_key(EntityKind::Course, "Course_1").await.unwrap_err();
        assert_eq!(err.to_string(), "Course Course_1 not found");

        // Kinds without a natural key are a programming error, not a miss
        let err = store.id_by_natural_key(EntityKind::Teacher, "anyone").await.unwrap_err();
        assert!(matches!(err, DbError::Other(_)));
    }
}
