//! The error taxonomy shared by every Stratus crate.
//!
//! Library crates keep their own richer error enums and convert into this one
//! at their boundary. The HTTP layer maps each variant onto a status code.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// The geocoder returned no candidate for the query.
  #[error("no location found for {0:?}")]
  NotFound(String),

  /// A horizon or date range the caller supplied is unusable.
  #[error("invalid range: {0}")]
  InvalidRange(String),

  /// The weather provider failed or answered with something unusable.
  #[error("upstream error: {0}")]
  Upstream(#[source] BoxError),

  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] BoxError),

  #[error("storage integrity error: {0}")]
  StorageIntegrity(#[source] BoxError),
}

impl Error {
  /// Build an [`Error::Upstream`] from a plain message.
  pub fn upstream(message: impl Into<String>) -> Self {
    Self::Upstream(message.into().into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
