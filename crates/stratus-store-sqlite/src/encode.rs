//! Encoding and decoding helpers between the row types and the plain-text
//! representations stored in SQLite columns.
//!
//! Instants are stored as RFC 3339 UTC strings with whole seconds and a `Z`
//! suffix, so lexical order matches chronological order and range filters
//! can compare strings. Dates are stored as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use stratus_core::rows::{
  DailyRow, HourlyRow, LocationId, LocationRow, StoredLocation,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Secs, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns of a `locations` row, timestamps still as text.
pub struct RawLocation {
  pub location_id: i64,
  pub name:        String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub timezone:    Option<String>,
  pub typed_name:  String,
  pub population:  Option<i64>,
  pub elevation:   Option<f64>,
  pub country:     Option<String>,
  pub admin1:      Option<String>,
  pub updated_at:  String,
}

pub const LOCATION_COLUMNS: &str = "location_id, name, latitude, longitude, timezone, typed_name, \
                                    population, elevation, country, admin1, updated_at";

impl RawLocation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      location_id: row.get(0)?,
      name:        row.get(1)?,
      latitude:    row.get(2)?,
      longitude:   row.get(3)?,
      timezone:    row.get(4)?,
      typed_name:  row.get(5)?,
      population:  row.get(6)?,
      elevation:   row.get(7)?,
      country:     row.get(8)?,
      admin1:      row.get(9)?,
      updated_at:  row.get(10)?,
    })
  }

  pub fn into_stored(self) -> Result<StoredLocation> {
    Ok(StoredLocation {
      location_id: LocationId(self.location_id),
      updated_at:  decode_dt(&self.updated_at)?,
      location:    LocationRow {
        name:       self.name,
        latitude:   self.latitude,
        longitude:  self.longitude,
        timezone:   self.timezone,
        typed_name: self.typed_name,
        population: self.population,
        elevation:  self.elevation,
        country:    self.country,
        admin1:     self.admin1,
      },
    })
  }
}

/// Measurement columns in the order they are bound and selected.
pub const HOURLY_COLUMNS: &str = "observation_time, temperature_2m, relative_humidity_2m, \
                                  dew_point_2m, apparent_temperature, rain, snowfall, snow_depth, \
                                  surface_pressure, cloud_cover, wind_speed_10m, wind_gusts_10m, \
                                  wind_direction_10m, soil_temperature_0_to_7cm, \
                                  soil_moisture_0_to_7cm";

pub struct RawHourly {
  pub observation_time: String,
  pub values:           [Option<f64>; 14],
}

impl RawHourly {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let mut values = [None; 14];
    for (i, slot) in values.iter_mut().enumerate() {
      *slot = row.get(i + 1)?;
    }
    Ok(Self { observation_time: row.get(0)?, values })
  }

  pub fn into_row(self) -> Result<HourlyRow> {
    let [
      temperature_2m,
      relative_humidity_2m,
      dew_point_2m,
      apparent_temperature,
      rain,
      snowfall,
      snow_depth,
      surface_pressure,
      cloud_cover,
      wind_speed_10m,
      wind_gusts_10m,
      wind_direction_10m,
      soil_temperature_0_to_7cm,
      soil_moisture_0_to_7cm,
    ] = self.values;

    Ok(HourlyRow {
      observation_time: decode_dt(&self.observation_time)?,
      temperature_2m,
      relative_humidity_2m,
      dew_point_2m,
      apparent_temperature,
      rain,
      snowfall,
      snow_depth,
      surface_pressure,
      cloud_cover,
      wind_speed_10m,
      wind_gusts_10m,
      wind_direction_10m,
      soil_temperature_0_to_7cm,
      soil_moisture_0_to_7cm,
    })
  }
}

/// The measurement fields of `row`, in [`HOURLY_COLUMNS`] order.
pub fn hourly_values(row: &HourlyRow) -> [Option<f64>; 14] {
  [
    row.temperature_2m,
    row.relative_humidity_2m,
    row.dew_point_2m,
    row.apparent_temperature,
    row.rain,
    row.snowfall,
    row.snow_depth,
    row.surface_pressure,
    row.cloud_cover,
    row.wind_speed_10m,
    row.wind_gusts_10m,
    row.wind_direction_10m,
    row.soil_temperature_0_to_7cm,
    row.soil_moisture_0_to_7cm,
  ]
}

pub const DAILY_COLUMNS: &str = "date, sunrise, sunset, precipitation_sum, temperature_2m_max, \
                                 temperature_2m_min, wind_gusts_10m_max, wind_speed_10m_max, \
                                 wind_direction_10m_dominant";

pub struct RawDaily {
  pub date:    String,
  pub sunrise: Option<String>,
  pub sunset:  Option<String>,
  pub values:  [Option<f64>; 6],
}

impl RawDaily {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let mut values = [None; 6];
    for (i, slot) in values.iter_mut().enumerate() {
      *slot = row.get(i + 3)?;
    }
    Ok(Self { date: row.get(0)?, sunrise: row.get(1)?, sunset: row.get(2)?, values })
  }

  pub fn into_row(self) -> Result<DailyRow> {
    let [
      precipitation_sum,
      temperature_2m_max,
      temperature_2m_min,
      wind_gusts_10m_max,
      wind_speed_10m_max,
      wind_direction_10m_dominant,
    ] = self.values;

    Ok(DailyRow {
      date: decode_date(&self.date)?,
      sunrise: self.sunrise.as_deref().map(decode_dt).transpose()?,
      sunset: self.sunset.as_deref().map(decode_dt).transpose()?,
      precipitation_sum,
      temperature_2m_max,
      temperature_2m_min,
      wind_gusts_10m_max,
      wind_speed_10m_max,
      wind_direction_10m_dominant,
    })
  }
}

/// The measurement fields of `row`, in [`DAILY_COLUMNS`] order after the
/// two sun times.
pub fn daily_values(row: &DailyRow) -> [Option<f64>; 6] {
  [
    row.precipitation_sum,
    row.temperature_2m_max,
    row.temperature_2m_min,
    row.wind_gusts_10m_max,
    row.wind_speed_10m_max,
    row.wind_direction_10m_dominant,
  ]
}
