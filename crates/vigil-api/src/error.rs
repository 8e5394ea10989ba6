//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] vigil_core::Error),
}

impl From<vigil_core::Error> for ApiError {
  fn from(e: vigil_core::Error) -> Self {
    use vigil_core::Error as E;
    match e {
      E::NotFound { .. } => ApiError::NotFound(e.to_string()),
      E::DuplicateKey { .. } => ApiError::Conflict(e.to_string()),
      E::InvalidInput(m) => ApiError::BadRequest(m),
      E::StorageUnavailable(_) => ApiError::Store(e),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "storage failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_map_to_status_codes() {
    let cases = [
      (vigil_core::Error::not_found("license", "1"), StatusCode::NOT_FOUND),
      (vigil_core::Error::duplicate("license", "1"), StatusCode::CONFLICT),
      (
        vigil_core::Error::InvalidInput("`name` is required".into()),
        StatusCode::BAD_REQUEST,
      ),
      (
        vigil_core::Error::StorageUnavailable("disk on fire".into()),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];
    for (err, expected) in cases {
      assert_eq!(ApiError::from(err).into_response().status(), expected);
    }
  }
}
