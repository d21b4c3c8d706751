use crate::db::errors::DbError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Request input failed a shape check (blank name, non-positive id, past lesson...)
    #[error("{message}")]
    BadRequest { message: String },

    /// A search filter value could not be parsed as the type its dimension requires
    #[error("Invalid value '{value}' for {parameter}: {reason}")]
    InvalidArgument {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound { .. } => StatusCode::NOT_FOUND,
                DbError::AlreadyExists { .. } => StatusCode::CONFLICT,
                DbError::NotExists { .. } => StatusCode::CONFLICT,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::CONFLICT,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::InvalidArgument { .. } => self.to_string(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound { .. } | DbError::AlreadyExists { .. } | DbError::NotExists { .. } => db_err.to_string(),
                DbError::UniqueViolation { table, .. } => unique_violation_message(table.as_deref()).0.to_string(),
                DbError::ForeignKeyViolation { .. } => "The resource is still referenced by other resources".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

/// Message and resource name for a natural-key collision on `table`
fn unique_violation_message(table: Option<&str>) -> (&'static str, &'static str) {
    match table {
        Some("courses") => ("A course with this name already exists", "course"),
        Some("groups") => ("A group with this description already exists", "group"),
        Some("training_programs") => ("A training program with this speciality already exists", "training_program"),
        _ => ("Resource already exists", "unknown"),
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(DbError::NotFound { .. }) => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::BadRequest { .. } | Error::InvalidArgument { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            // Natural-key collisions get a minimal structured body naming the resource
            Error::Database(DbError::UniqueViolation { table, .. }) => {
                let (message, resource) = unique_violation_message(table.as_deref());
                let body = json!({
                    "message": message,
                    "resource": resource
                });

                (status, axum::response::Json(body)).into_response()
            }
            _ => (status, self.user_message()).into_response(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(err.into())
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
