//! Shared pieces of the HTTP layer: the error type every handler returns,
//! the pretty-printed JSON response body, and the blocking database helper.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use pizzeria_db::DbPool;
use pizzeria_models::{ModelError, ProjectionError};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Body of every 404 from the restaurant routes.
pub const RESTAURANT_NOT_FOUND: &str = "Restaurant not found";
/// Message returned when an association names a missing parent.
pub const INVALID_REFERENCE: &str = "Invalid restaurant or pizza ID";

/// API error type mapping to HTTP status codes.
///
/// `NotFound` and `Internal` render as `{"error": message}`; the two client
/// errors on creation render as `{"errors": [message]}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The canonical restaurant lookup miss.
    pub fn restaurant_not_found() -> Self {
        ApiError::NotFound(RESTAURANT_NOT_FOUND.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound(msg) => json!({ "error": msg }),
            ApiError::Validation(msg) | ApiError::InvalidReference(msg) => {
                json!({ "errors": [msg] })
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                json!({ "error": msg })
            }
        };

        (status, PrettyJson(body)).into_response()
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::RestaurantNotFound(_) => ApiError::restaurant_not_found(),
            ModelError::InvalidReference { .. } => {
                ApiError::InvalidReference(INVALID_REFERENCE.to_string())
            }
            ModelError::Validation(msg) => ApiError::Validation(msg),
            ModelError::Database(e) => ApiError::Internal(format!("database error: {}", e)),
        }
    }
}

impl From<ProjectionError> for ApiError {
    fn from(e: ProjectionError) -> Self {
        ApiError::Internal(format!("serialization error: {}", e))
    }
}

/// JSON response body indented with two spaces and ending in a newline.
#[derive(Debug, Clone)]
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec_pretty(&self.0) {
            Ok(mut buf) => {
                buf.push(b'\n');
                (
                    [(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )],
                    buf,
                )
                    .into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response body");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// `op` names the operation in log lines when the pool or the task fails.
pub async fn with_conn<T, F>(pool: &DbPool, op: &'static str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, op, "failed to get db connection");
            ApiError::Internal(format!("db connection failed: {}", e))
        })?;
        f(&conn)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, op, "task join error");
        ApiError::Internal(format!("task join error: {}", e))
    })?
}
