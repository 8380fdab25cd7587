//! The `ObservationStore` trait: the batch upsert writer and its read side.
//!
//! Implemented by `stratus-store-sqlite`. The pipeline depends on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};

use crate::rows::{DailyRow, HourlyRow, LocationId, StoredLocation, WeatherBatch, WriteSummary};

/// Abstraction over a relational observation store.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ObservationStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a location and its observation batches atomically.
  ///
  /// 1. Upserts the location on `(latitude, longitude)`, refreshing metadata.
  /// 2. Binds every row to the resulting [`LocationId`].
  /// 3. Drops earlier duplicates of each conflict key within the batch.
  /// 4. Inserts each row, overwriting the stored measurements on conflict.
  ///
  /// All of it happens in one transaction: on any error nothing is kept,
  /// including the location change.
  fn upsert_batch(
    &self,
    batch: WeatherBatch,
  ) -> impl Future<Output = Result<WriteSummary, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Look up a location by its natural key. Coordinates are normalised
  /// the same way the writer normalises them.
  fn find_location(
    &self,
    latitude: f64,
    longitude: f64,
  ) -> impl Future<Output = Result<Option<StoredLocation>, Self::Error>> + Send + '_;

  fn list_locations(
    &self,
  ) -> impl Future<Output = Result<Vec<StoredLocation>, Self::Error>> + Send + '_;

  /// Hourly rows with `from <= observation_time <= to`, ordered by time.
  fn hourly_between(
    &self,
    location_id: LocationId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<HourlyRow>, Self::Error>> + Send + '_;

  /// Daily rows with `from <= date <= to`, ordered by date.
  fn daily_between(
    &self,
    location_id: LocationId,
    from: NaiveDate,
    to: NaiveDate,
  ) -> impl Future<Output = Result<Vec<DailyRow>, Self::Error>> + Send + '_;
}
