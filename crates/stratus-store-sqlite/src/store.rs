//! [`SqliteStore`]: the SQLite implementation of [`ObservationStore`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use stratus_core::{
  batch::{Bound, bind, dedup_last_wins},
  location::Coordinates,
  rows::{
    DailyRow, HourlyRow, LocationId, LocationRow, StoredLocation, WeatherBatch, WriteSummary,
  },
  store::ObservationStore,
};

use crate::{
  Error, Result,
  encode::{
    DAILY_COLUMNS, HOURLY_COLUMNS, LOCATION_COLUMNS, RawDaily, RawHourly, RawLocation,
    daily_values, encode_date, encode_dt, hourly_values,
  },
  schema::SCHEMA,
};

// ─── SQL ─────────────────────────────────────────────────────────────────────

const UPSERT_LOCATION: &str = "
INSERT INTO locations (
    name, latitude, longitude, timezone, typed_name,
    population, elevation, country, admin1, created_at, updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
ON CONFLICT (latitude, longitude) DO UPDATE SET
    name       = excluded.name,
    timezone   = excluded.timezone,
    typed_name = excluded.typed_name,
    population = excluded.population,
    elevation  = excluded.elevation,
    country    = excluded.country,
    admin1     = excluded.admin1,
    updated_at = excluded.updated_at
RETURNING location_id";

const UPSERT_HOURLY: &str = "
INSERT INTO weather_hourly (
    location_id, observation_time, temperature_2m, relative_humidity_2m,
    dew_point_2m, apparent_temperature, rain, snowfall, snow_depth,
    surface_pressure, cloud_cover, wind_speed_10m, wind_gusts_10m,
    wind_direction_10m, soil_temperature_0_to_7cm, soil_moisture_0_to_7cm
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
ON CONFLICT (location_id, observation_time) DO UPDATE SET
    temperature_2m            = excluded.temperature_2m,
    relative_humidity_2m      = excluded.relative_humidity_2m,
    dew_point_2m              = excluded.dew_point_2m,
    apparent_temperature      = excluded.apparent_temperature,
    rain                      = excluded.rain,
    snowfall                  = excluded.snowfall,
    snow_depth                = excluded.snow_depth,
    surface_pressure          = excluded.surface_pressure,
    cloud_cover               = excluded.cloud_cover,
    wind_speed_10m            = excluded.wind_speed_10m,
    wind_gusts_10m            = excluded.wind_gusts_10m,
    wind_direction_10m        = excluded.wind_direction_10m,
    soil_temperature_0_to_7cm = excluded.soil_temperature_0_to_7cm,
    soil_moisture_0_to_7cm    = excluded.soil_moisture_0_to_7cm";

const UPSERT_DAILY: &str = "
INSERT INTO weather_daily (
    location_id, date, sunrise, sunset, precipitation_sum,
    temperature_2m_max, temperature_2m_min, wind_gusts_10m_max,
    wind_speed_10m_max, wind_direction_10m_dominant
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
ON CONFLICT (location_id, date) DO UPDATE SET
    sunrise                     = excluded.sunrise,
    sunset                      = excluded.sunset,
    precipitation_sum           = excluded.precipitation_sum,
    temperature_2m_max          = excluded.temperature_2m_max,
    temperature_2m_min          = excluded.temperature_2m_min,
    wind_gusts_10m_max          = excluded.wind_gusts_10m_max,
    wind_speed_10m_max          = excluded.wind_speed_10m_max,
    wind_direction_10m_dominant = excluded.wind_direction_10m_dominant";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An observation store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is shared. Every write runs
/// on the connection's own thread, so batches are serialised.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Transaction steps ───────────────────────────────────────────────────────

fn upsert_location(
  tx: &rusqlite::Transaction<'_>,
  location: &LocationRow,
  now: &str,
) -> rusqlite::Result<LocationId> {
  let key = Coordinates::new(location.latitude, location.longitude).normalized();
  tx.query_row(
    UPSERT_LOCATION,
    rusqlite::params![
      location.name,
      key.latitude,
      key.longitude,
      location.timezone,
      location.typed_name,
      location.population,
      location.elevation,
      location.country,
      location.admin1,
      now,
    ],
    |row| row.get(0).map(LocationId),
  )
}

fn write_hourly(tx: &rusqlite::Transaction<'_>, rows: &[Bound<HourlyRow>]) -> rusqlite::Result<()> {
  let mut stmt = tx.prepare_cached(UPSERT_HOURLY)?;
  for Bound { location_id, row } in rows {
    let time = encode_dt(row.observation_time);
    let v = hourly_values(row);
    stmt.execute(rusqlite::params![
      location_id.0,
      time,
      v[0],
      v[1],
      v[2],
      v[3],
      v[4],
      v[5],
      v[6],
      v[7],
      v[8],
      v[9],
      v[10],
      v[11],
      v[12],
      v[13],
    ])?;
  }
  Ok(())
}

fn write_daily(tx: &rusqlite::Transaction<'_>, rows: &[Bound<DailyRow>]) -> rusqlite::Result<()> {
  let mut stmt = tx.prepare_cached(UPSERT_DAILY)?;
  for Bound { location_id, row } in rows {
    let v = daily_values(row);
    stmt.execute(rusqlite::params![
      location_id.0,
      encode_date(row.date),
      row.sunrise.map(encode_dt),
      row.sunset.map(encode_dt),
      v[0],
      v[1],
      v[2],
      v[3],
      v[4],
      v[5],
    ])?;
  }
  Ok(())
}

// ─── ObservationStore impl ───────────────────────────────────────────────────

impl ObservationStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn upsert_batch(&self, batch: WeatherBatch) -> Result<WriteSummary> {
    let WeatherBatch { location, hourly, daily } = batch;
    let hourly_in = hourly.len();
    let daily_in = daily.len();
    let now = encode_dt(Utc::now());

    let (location_id, hourly_written, daily_written) = self
      .conn
      .call(move |conn| {
        // Take the write lock before touching anything.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let location_id = upsert_location(&tx, &location, &now)?;
        let hourly = dedup_last_wins(bind(location_id, hourly));
        let daily = dedup_last_wins(bind(location_id, daily));
        write_hourly(&tx, &hourly)?;
        write_daily(&tx, &daily)?;

        tx.commit()?;
        Ok((location_id, hourly.len(), daily.len()))
      })
      .await?;

    let summary = WriteSummary {
      location_id,
      hourly_written,
      hourly_dropped: hourly_in - hourly_written,
      daily_written,
      daily_dropped: daily_in - daily_written,
    };
    tracing::debug!(
      location_id = %summary.location_id,
      hourly = summary.hourly_written,
      hourly_dropped = summary.hourly_dropped,
      daily = summary.daily_written,
      daily_dropped = summary.daily_dropped,
      "batch upserted"
    );
    Ok(summary)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_location(&self, latitude: f64, longitude: f64) -> Result<Option<StoredLocation>> {
    let key = Coordinates::new(latitude, longitude).normalized();

    let raw: Option<RawLocation> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {LOCATION_COLUMNS} FROM locations WHERE latitude = ?1 AND longitude = ?2"
            ),
            rusqlite::params![key.latitude, key.longitude],
            RawLocation::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawLocation::into_stored).transpose()
  }

  async fn list_locations(&self) -> Result<Vec<StoredLocation>> {
    let raws: Vec<RawLocation> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {LOCATION_COLUMNS} FROM locations ORDER BY location_id"))?;
        let rows = stmt
          .query_map([], RawLocation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLocation::into_stored).collect()
  }

  async fn hourly_between(
    &self,
    location_id: LocationId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
  ) -> Result<Vec<HourlyRow>> {
    let from = encode_dt(from);
    let to = encode_dt(to);

    let raws: Vec<RawHourly> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HOURLY_COLUMNS} FROM weather_hourly
           WHERE location_id = ?1 AND observation_time BETWEEN ?2 AND ?3
           ORDER BY observation_time"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![location_id.0, from, to], RawHourly::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHourly::into_row).collect()
  }

  async fn daily_between(
    &self,
    location_id: LocationId,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<Vec<DailyRow>> {
    let from = encode_date(from);
    let to = encode_date(to);

    let raws: Vec<RawDaily> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DAILY_COLUMNS} FROM weather_daily
           WHERE location_id = ?1 AND date BETWEEN ?2 AND ?3
           ORDER BY date"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![location_id.0, from, to], RawDaily::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDaily::into_row).collect()
  }
}
