//! User-facing read models served by the HTTP layer and printed by the CLI.
//!
//! These are computed from an [`ObservationTable`] on every request and never
//! stored. Derived values are rounded with [`round2`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  location::Location,
  mode::FetchMode,
  table::{Frame, ObservationTable},
  transform::{daily_rows, epoch_to_utc, round2},
};

// ─── Location summary ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
  pub city:      String,
  pub region:    Option<String>,
  pub country:   Option<String>,
  pub latitude:  f64,
  pub longitude: f64,
  pub timezone:  Option<String>,
}

impl From<&Location> for Place {
  fn from(location: &Location) -> Self {
    Self {
      city:      location.name.clone(),
      region:    location.admin1.clone(),
      country:   location.country.clone(),
      latitude:  location.latitude,
      longitude: location.longitude,
      timezone:  location.timezone.clone(),
    }
  }
}

// ─── Current ─────────────────────────────────────────────────────────────────

/// The latest snapshot for a place. Temperatures in °F, wind in mph,
/// precipitation in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
  #[serde(flatten)]
  pub place:                Place,
  pub time:                 DateTime<Utc>,
  pub temperature:          Option<f64>,
  pub apparent_temperature: Option<f64>,
  pub relative_humidity:    Option<f64>,
  pub cloud_cover:          Option<f64>,
  pub precipitation:        Option<f64>,
  pub wind_speed:           Option<f64>,
  pub wind_gusts:           Option<f64>,
  pub wind_direction:       Option<f64>,
  pub weather_code:         Option<i32>,
  pub is_day:               Option<bool>,
}

impl CurrentConditions {
  pub fn from_table(table: &ObservationTable, location: &Location) -> Result<Self> {
    let frame = table
      .current
      .as_ref()
      .filter(|f| !f.is_empty())
      .ok_or_else(|| Error::upstream("response has no current conditions"))?;
    let v = |name: &str| frame.value(0, name);

    Ok(Self {
      place:                Place::from(location),
      time:                 epoch_to_utc(frame.time[0])?,
      temperature:          v("temperature_2m"),
      apparent_temperature: v("apparent_temperature").map(round2),
      relative_humidity:    v("relative_humidity_2m"),
      cloud_cover:          v("cloud_cover"),
      precipitation:        v("precipitation"),
      wind_speed:           v("wind_speed_10m"),
      wind_gusts:           v("wind_gusts_10m"),
      wind_direction:       v("wind_direction_10m"),
      weather_code:         v("weather_code").map(|c| c as i32),
      is_day:               v("is_day").map(|d| d >= 1.0),
    })
  }
}

// ─── Forecast ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
  pub date:              NaiveDate,
  pub temperature_max:   Option<f64>,
  pub temperature_min:   Option<f64>,
  pub precipitation_sum: Option<f64>,
  pub wind_speed_max:    Option<f64>,
  pub wind_gusts_max:    Option<f64>,
  pub sunrise:           Option<DateTime<Utc>>,
  pub sunset:            Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
  pub time:                      DateTime<Utc>,
  pub temperature:               Option<f64>,
  pub apparent_temperature:      Option<f64>,
  pub precipitation_probability: Option<f64>,
  pub weather_code:              Option<i32>,
}

/// A forecast for one place: daily entries for a day horizon, hourly entries
/// for an hour horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastView {
  #[serde(flatten)]
  pub place:   Place,
  pub horizon: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub daily:   Vec<DailyForecast>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub hourly:  Vec<HourlyForecast>,
}

impl ForecastView {
  pub fn from_table(table: &ObservationTable, location: &Location, mode: &FetchMode) -> Result<Self> {
    let daily = match &table.daily {
      Some(frame) => daily_rows(frame, table.utc_offset_seconds)?
        .into_iter()
        .map(|row| DailyForecast {
          date:              row.date,
          temperature_max:   row.temperature_2m_max,
          temperature_min:   row.temperature_2m_min,
          precipitation_sum: row.precipitation_sum,
          wind_speed_max:    row.wind_speed_10m_max,
          wind_gusts_max:    row.wind_gusts_10m_max,
          sunrise:           row.sunrise,
          sunset:            row.sunset,
        })
        .collect(),
      None => Vec::new(),
    };
    let hourly = match &table.hourly {
      Some(frame) => hourly_forecast(frame)?,
      None => Vec::new(),
    };

    Ok(Self { place: Place::from(location), horizon: mode.label(), daily, hourly })
  }
}

fn hourly_forecast(frame: &Frame) -> Result<Vec<HourlyForecast>> {
  frame
    .time
    .iter()
    .enumerate()
    .map(|(i, &secs)| {
      Ok(HourlyForecast {
        time:                      epoch_to_utc(secs)?,
        temperature:               frame.value(i, "temperature_2m"),
        apparent_temperature:      frame.value(i, "apparent_temperature").map(round2),
        precipitation_probability: frame.value(i, "precipitation_probability").map(round2),
        weather_code:              frame.value(i, "weather_code").map(|c| c as i32),
      })
    })
    .collect()
}
