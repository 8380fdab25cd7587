//! Row transformer: fetched table + location → storage rows. No I/O.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
  Error, Result,
  location::{Coordinates, Location},
  rows::{DailyRow, HourlyRow, LocationRow, WeatherBatch},
  table::{Frame, ObservationTable},
};

/// Reshape `table` into the rows a store expects.
///
/// Produces exactly one hourly row per hourly index and one daily row per
/// daily index; missing values stay `None`. Fails only when the provider
/// sent a timestamp outside the representable range.
pub fn transform(table: &ObservationTable, location: &Location) -> Result<WeatherBatch> {
  let hourly = match &table.hourly {
    Some(frame) => hourly_rows(frame)?,
    None => Vec::new(),
  };
  let daily = match &table.daily {
    Some(frame) => daily_rows(frame, table.utc_offset_seconds)?,
    None => Vec::new(),
  };
  Ok(WeatherBatch { location: location_row(location), hourly, daily })
}

/// Storage form of a geocoded location, with normalised coordinates.
pub fn location_row(location: &Location) -> LocationRow {
  let coords = Coordinates::new(location.latitude, location.longitude).normalized();
  LocationRow {
    name:       location.name.clone(),
    latitude:   coords.latitude,
    longitude:  coords.longitude,
    timezone:   location.timezone.clone(),
    typed_name: location.typed_name.clone(),
    population: location.population,
    elevation:  location.elevation,
    country:    location.country.clone(),
    admin1:     location.admin1.clone(),
  }
}

pub fn hourly_rows(frame: &Frame) -> Result<Vec<HourlyRow>> {
  frame
    .time
    .iter()
    .enumerate()
    .map(|(i, &secs)| {
      let v = |name: &str| frame.value(i, name);
      Ok(HourlyRow {
        observation_time:          epoch_to_utc(secs)?,
        temperature_2m:            v("temperature_2m"),
        relative_humidity_2m:      v("relative_humidity_2m"),
        dew_point_2m:              v("dew_point_2m"),
        apparent_temperature:      v("apparent_temperature"),
        rain:                      v("rain"),
        snowfall:                  v("snowfall"),
        snow_depth:                v("snow_depth"),
        surface_pressure:          v("surface_pressure"),
        cloud_cover:               v("cloud_cover"),
        wind_speed_10m:            v("wind_speed_10m"),
        wind_gusts_10m:            v("wind_gusts_10m"),
        wind_direction_10m:        v("wind_direction_10m"),
        soil_temperature_0_to_7cm: v("soil_temperature_0_to_7cm"),
        soil_moisture_0_to_7cm:    v("soil_moisture_0_to_7cm"),
      })
    })
    .collect()
}

pub fn daily_rows(frame: &Frame, utc_offset_seconds: i32) -> Result<Vec<DailyRow>> {
  frame
    .time
    .iter()
    .enumerate()
    .map(|(i, &secs)| {
      let v = |name: &str| frame.value(i, name);
      let instant = |name: &str| v(name).map(|s| epoch_to_utc(s as i64)).transpose();
      Ok(DailyRow {
        date:                        local_date(secs, utc_offset_seconds)?,
        sunrise:                     instant("sunrise")?,
        sunset:                      instant("sunset")?,
        precipitation_sum:           v("precipitation_sum"),
        temperature_2m_max:          v("temperature_2m_max"),
        temperature_2m_min:          v("temperature_2m_min"),
        wind_gusts_10m_max:          v("wind_gusts_10m_max"),
        wind_speed_10m_max:          v("wind_speed_10m_max"),
        wind_direction_10m_dominant: v("wind_direction_10m_dominant"),
      })
    })
    .collect()
}

/// Epoch seconds → UTC instant.
pub fn epoch_to_utc(secs: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp(secs, 0)
    .ok_or_else(|| Error::upstream(format!("timestamp {secs} is out of range")))
}

/// The provider's local calendar date for an epoch timestamp.
pub fn local_date(secs: i64, utc_offset_seconds: i32) -> Result<NaiveDate> {
  Ok(epoch_to_utc(secs.saturating_add(i64::from(utc_offset_seconds)))?.date_naive())
}

/// Round to two decimal places for user-facing output.
pub fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }
