//! Storage-shaped rows produced by the transformer and consumed by stores.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── Location ────────────────────────────────────────────────────────────────

/// Surrogate key of a `locations` row, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub i64);

impl std::fmt::Display for LocationId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
}

/// Location metadata as written to `locations`. `(latitude, longitude)` is the
/// conflict key; everything else is overwritten on every upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRow {
  pub name:       String,
  pub latitude:   f64,
  pub longitude:  f64,
  pub timezone:   Option<String>,
  pub typed_name: String,
  pub population: Option<i64>,
  pub elevation:  Option<f64>,
  pub country:    Option<String>,
  pub admin1:     Option<String>,
}

/// A `locations` row as read back from a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLocation {
  pub location_id: LocationId,
  pub location:    LocationRow,
  pub updated_at:  DateTime<Utc>,
}

// ─── Observations ────────────────────────────────────────────────────────────

/// One hour of observations. Conflict key: `(location, observation_time)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRow {
  pub observation_time:          DateTime<Utc>,
  pub temperature_2m:            Option<f64>,
  pub relative_humidity_2m:      Option<f64>,
  pub dew_point_2m:              Option<f64>,
  pub apparent_temperature:      Option<f64>,
  pub rain:                      Option<f64>,
  pub snowfall:                  Option<f64>,
  pub snow_depth:                Option<f64>,
  pub surface_pressure:          Option<f64>,
  pub cloud_cover:               Option<f64>,
  pub wind_speed_10m:            Option<f64>,
  pub wind_gusts_10m:            Option<f64>,
  pub wind_direction_10m:        Option<f64>,
  pub soil_temperature_0_to_7cm: Option<f64>,
  pub soil_moisture_0_to_7cm:    Option<f64>,
}

impl HourlyRow {
  /// A row for `observation_time` with every measurement missing.
  pub fn empty(observation_time: DateTime<Utc>) -> Self {
    Self {
      observation_time,
      temperature_2m: None,
      relative_humidity_2m: None,
      dew_point_2m: None,
      apparent_temperature: None,
      rain: None,
      snowfall: None,
      snow_depth: None,
      surface_pressure: None,
      cloud_cover: None,
      wind_speed_10m: None,
      wind_gusts_10m: None,
      wind_direction_10m: None,
      soil_temperature_0_to_7cm: None,
      soil_moisture_0_to_7cm: None,
    }
  }
}

/// One day of aggregates. Conflict key: `(location, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
  pub date:                        NaiveDate,
  pub sunrise:                     Option<DateTime<Utc>>,
  pub sunset:                      Option<DateTime<Utc>>,
  pub precipitation_sum:           Option<f64>,
  pub temperature_2m_max:          Option<f64>,
  pub temperature_2m_min:          Option<f64>,
  pub wind_gusts_10m_max:          Option<f64>,
  pub wind_speed_10m_max:          Option<f64>,
  pub wind_direction_10m_dominant: Option<f64>,
}

impl DailyRow {
  /// A row for `date` with every measurement missing.
  pub fn empty(date: NaiveDate) -> Self {
    Self {
      date,
      sunrise: None,
      sunset: None,
      precipitation_sum: None,
      temperature_2m_max: None,
      temperature_2m_min: None,
      wind_gusts_10m_max: None,
      wind_speed_10m_max: None,
      wind_direction_10m_dominant: None,
    }
  }
}

// ─── Batches ─────────────────────────────────────────────────────────────────

/// Everything one fetch+transform cycle produced for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherBatch {
  pub location: LocationRow,
  pub hourly:   Vec<HourlyRow>,
  pub daily:    Vec<DailyRow>,
}

/// Outcome of [`ObservationStore::upsert_batch`](crate::store::ObservationStore::upsert_batch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
  pub location_id:    LocationId,
  pub hourly_written: usize,
  /// Earlier duplicates discarded by intra-batch dedup.
  pub hourly_dropped: usize,
  pub daily_written:  usize,
  pub daily_dropped:  usize,
}
