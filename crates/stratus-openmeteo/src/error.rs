//! Error type for `stratus-openmeteo`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Validation failures raised before any request is sent.
  #[error("core error: {0}")]
  Core(#[from] stratus_core::Error),

  #[error("no location found for {0:?}")]
  NotFound(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The provider answered with a non-success status and no usable reason.
  #[error("{url} returned {status}")]
  Status { url: String, status: StatusCode },

  /// The provider refused the request and said why.
  #[error("provider rejected request ({status}): {reason}")]
  Rejected { status: StatusCode, reason: String },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A well-formed JSON body that does not have the expected shape.
  #[error("malformed response: {0}")]
  Malformed(String),
}

impl From<Error> for stratus_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::NotFound(query) => stratus_core::Error::NotFound(query),
      other => stratus_core::Error::Upstream(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
