//! Error type for `stratus-store-sqlite`.

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The database could not be opened, was locked, or the connection is gone.
  #[error("storage unavailable: {0}")]
  Unavailable(#[source] tokio_rusqlite::Error),

  /// A constraint other than the intentional upsert conflict key failed.
  #[error("constraint violation: {0}")]
  Integrity(#[source] tokio_rusqlite::Error),

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    let closed = matches!(
      e,
      tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_)
    );
    let code = match &e {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, _)) => {
        Some(failure.code)
      }
      _ => None,
    };

    match code {
      _ if closed => Error::Unavailable(e),
      Some(ErrorCode::ConstraintViolation) => Error::Integrity(e),
      Some(
        ErrorCode::CannotOpen
        | ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::NotADatabase
        | ErrorCode::PermissionDenied
        | ErrorCode::ReadOnly
        | ErrorCode::DiskFull
        | ErrorCode::SystemIoFailure,
      ) => Error::Unavailable(e),
      _ => Error::Database(e),
    }
  }
}

impl From<Error> for stratus_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Unavailable(_) => stratus_core::Error::StorageUnavailable(Box::new(e)),
      Error::Integrity(_) | Error::Database(_) | Error::DateParse(_) => {
        stratus_core::Error::StorageIntegrity(Box::new(e))
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
