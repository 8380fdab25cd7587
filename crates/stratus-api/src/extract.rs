//! Extractors whose rejections use the API's JSON error body.

use axum::extract::{FromRequestParts, rejection::QueryRejection};

use crate::error::ApiError;

/// [`axum::extract::Query`] that rejects with [`ApiError::BadRequest`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}
