use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of a region import run.
///
/// Every variant raised after processing started carries `committed`, the
/// number of records in batches that were committed before the failure.
/// Those rows stay in the table; only the in-flight batch is rolled back.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Batch write failed after {committed} committed records: {source}")]
    Write {
        committed: u64,
        #[source]
        source: AppError,
    },

    #[error("Reading region source failed after {committed} committed records: {source}")]
    Source {
        committed: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Level summary query failed after {committed} committed records: {source}")]
    Summary {
        committed: u64,
        #[source]
        source: AppError,
    },
}

impl LoadError {
    /// Records committed before the failure (zero when processing never started)
    pub fn committed(&self) -> u64 {
        match self {
            LoadError::Connection(_) | LoadError::Migration(_) => 0,
            LoadError::Write { committed, .. }
            | LoadError::Source { committed, .. }
            | LoadError::Summary { committed, .. } => *committed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("Region '11' not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("bad level".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_load_error_committed_count() {
        let err = LoadError::Write {
            committed: 2000,
            source: AppError::Database(sqlx::Error::Protocol("disk full".to_string())),
        };
        assert_eq!(err.committed(), 2000);
        assert!(err.to_string().contains("2000 committed records"));

        let err = LoadError::Connection(sqlx::Error::PoolTimedOut);
        assert_eq!(err.committed(), 0);
    }
}
