//! The ordered variable lists requested from the weather provider.
//!
//! Each list is the single source of truth for its block: the request builder
//! joins it into the `hourly=` / `daily=` / `current=` parameter, and the
//! extractor returns series in exactly this order. Anything that needs a
//! column by position asks [`position`] rather than hard-coding an index.

/// Hourly variables persisted to `weather_hourly`.
pub const HOURLY: &[&str] = &[
  "temperature_2m",
  "relative_humidity_2m",
  "dew_point_2m",
  "apparent_temperature",
  "rain",
  "snowfall",
  "snow_depth",
  "surface_pressure",
  "cloud_cover",
  "wind_speed_10m",
  "wind_gusts_10m",
  "wind_direction_10m",
  "soil_temperature_0_to_7cm",
  "soil_moisture_0_to_7cm",
];

/// Hourly variables for forecasts: the persisted set plus forecast-only
/// fields the archive endpoint does not serve.
pub const HOURLY_FORECAST: &[&str] = &[
  "temperature_2m",
  "relative_humidity_2m",
  "dew_point_2m",
  "apparent_temperature",
  "rain",
  "snowfall",
  "snow_depth",
  "surface_pressure",
  "cloud_cover",
  "wind_speed_10m",
  "wind_gusts_10m",
  "wind_direction_10m",
  "soil_temperature_0_to_7cm",
  "soil_moisture_0_to_7cm",
  "precipitation_probability",
  "weather_code",
];

/// Daily variables persisted to `weather_daily`. `sunrise` and `sunset` come
/// back as epoch seconds.
pub const DAILY: &[&str] = &[
  "precipitation_sum",
  "temperature_2m_max",
  "temperature_2m_min",
  "sunrise",
  "sunset",
  "wind_gusts_10m_max",
  "wind_speed_10m_max",
  "wind_direction_10m_dominant",
];

/// Variables for the single current-conditions snapshot.
pub const CURRENT: &[&str] = &[
  "temperature_2m",
  "relative_humidity_2m",
  "apparent_temperature",
  "weather_code",
  "is_day",
  "cloud_cover",
  "precipitation",
  "rain",
  "showers",
  "snowfall",
  "wind_speed_10m",
  "wind_gusts_10m",
  "wind_direction_10m",
  "pressure_msl",
  "surface_pressure",
];

/// Index of `name` within `variables`.
pub fn position(variables: &[&str], name: &str) -> Option<usize> {
  variables.iter().position(|v| *v == name)
}

/// Comma-joined form used in request query strings.
pub fn joined(variables: &[&str]) -> String { variables.join(",") }
