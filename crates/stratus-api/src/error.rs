//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stratus_core::BoxError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The provider or the store failed; reported as a bad gateway.
  #[error("upstream error: {0}")]
  Upstream(#[source] BoxError),
}

impl From<stratus_core::Error> for ApiError {
  fn from(e: stratus_core::Error) -> Self {
    match e {
      stratus_core::Error::NotFound(_) => ApiError::NotFound(e.to_string()),
      stratus_core::Error::InvalidRange(m) => ApiError::BadRequest(m),
      other => ApiError::Upstream(Box::new(other)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Upstream(e) => {
        tracing::warn!(error = %e, "upstream failure");
        (StatusCode::BAD_GATEWAY, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
