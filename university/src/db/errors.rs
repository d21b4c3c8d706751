use crate::types::{EntityKey, EntityKind};
use thiserror::Error;

/// Unified error type for database operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// No row of the given kind matched the key
    #[error("{entity} {key} not found")]
    NotFound { entity: EntityKind, key: EntityKey },

    /// An association add targeted a pair that is already linked
    #[error("{left} {left_id} is already associated with {right} {right_id}")]
    AlreadyExists {
        left: EntityKind,
        left_id: i32,
        right: EntityKind,
        right_id: i32,
    },

    /// An association remove targeted a pair that has no link
    #[error("{left} {left_id} is not associated with {right} {right_id}")]
    NotExists {
        left: EntityKind,
        left_id: i32,
        right: EntityKind,
        right_id: i32,
    },

    /// Unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Foreign key constraint violation
    #[error("Foreign key constraint violation")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Check constraint violation
    #[error("Check constraint violation")]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbError {
    pub fn not_found(entity: EntityKind, key: impl Into<EntityKey>) -> Self {
        DbError::NotFound { entity, key: key.into() }
    }
}

/// Convert from sqlx::Error using proper sqlx error categorization.
///
/// `RowNotFound` is deliberately not turned into [`DbError::NotFound`]: lookups use
/// `fetch_optional` and raise `NotFound` themselves, with the entity and key attached.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(|s| s.to_string());
                let table = db_err.table().map(|s| s.to_string());
                let message = db_err.message().to_string();

                if db_err.is_unique_violation() {
                    DbError::UniqueViolation { constraint, table, message }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation { constraint, table, message }
                } else if db_err.is_check_violation() {
                    DbError::CheckViolation { constraint, table, message }
                } else {
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        let by_id = DbError::not_found(EntityKind::Teacher, 99);
        assert_eq!(by_id.to_string(), "Teacher with id 99 not found");

        let by_name = DbError::not_found(EntityKind::Course, "course_x");
        assert_eq!(by_name.to_string(), "Course course_x not found");
    }

    #[test]
    fn test_association_messages() {
        let err = DbError::AlreadyExists {
            left: EntityKind::Course,
            left_id: 1,
            right: EntityKind::Teacher,
            right_id: 2,
        };
        assert_eq!(err.to_string(), "Course 1 is already associated with Teacher 2");

        let err = DbError::NotExists {
            left: EntityKind::TrainingProgram,
            left_id: 3,
            right: EntityKind::Course,
            right_id: 4,
        };
        assert_eq!(err.to_string(), "TrainingProgram 3 is not associated with Course 4");
    }

    #[test]
    fn test_row_not_found_is_not_a_lookup_miss() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Other(_)));
    }
}
