//! Request construction per [`FetchMode`]. Pure; no I/O.

use stratus_core::{
  location::Coordinates,
  mode::FetchMode,
  schema::{self, CURRENT, DAILY, HOURLY, HOURLY_FORECAST},
};

use crate::{cache::Expiry, config::ClientConfig};

/// Which response blocks a request asks for, each with its variable list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blocks {
  pub current: Option<&'static [&'static str]>,
  pub hourly:  Option<&'static [&'static str]>,
  pub daily:   Option<&'static [&'static str]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
  pub url:    String,
  pub query:  Vec<(String, String)>,
  pub blocks: Blocks,
  pub expiry: Expiry,
}

/// Build the provider request for `mode` at `coordinates`. The caller is
/// expected to have validated `mode`.
pub fn weather_request(
  config: &ClientConfig,
  coordinates: Coordinates,
  mode: FetchMode,
) -> WeatherRequest {
  let mut query = vec![
    pair("latitude", coordinates.latitude),
    pair("longitude", coordinates.longitude),
    pair("timezone", &config.timezone),
    pair("timeformat", "unixtime"),
    pair("temperature_unit", "fahrenheit"),
    pair("wind_speed_unit", "mph"),
    pair("precipitation_unit", "inch"),
  ];
  let mut blocks = Blocks::default();

  let forecast_ttl = std::time::Duration::from_secs(config.cache.forecast_ttl_secs);
  let (url, expiry) = match mode {
    FetchMode::Current => {
      blocks.current = Some(CURRENT);
      let ttl = std::time::Duration::from_secs(config.cache.current_ttl_secs);
      (&config.forecast_url, Expiry::After(ttl))
    }
    FetchMode::HourlyForecast { hours } => {
      query.push(pair("forecast_hours", hours));
      blocks.hourly = Some(HOURLY_FORECAST);
      (&config.forecast_url, Expiry::After(forecast_ttl))
    }
    FetchMode::DailyForecast { days } => {
      query.push(pair("forecast_days", days));
      blocks.daily = Some(DAILY);
      (&config.forecast_url, Expiry::After(forecast_ttl))
    }
    FetchMode::Historical { start, end } => {
      query.push(pair("start_date", start));
      query.push(pair("end_date", end));
      blocks.hourly = Some(HOURLY);
      blocks.daily = Some(DAILY);
      (&config.archive_url, Expiry::Never)
    }
  };

  for (name, variables) in [
    ("current", blocks.current),
    ("hourly", blocks.hourly),
    ("daily", blocks.daily),
  ] {
    if let Some(variables) = variables {
      query.push(pair(name, schema::joined(variables)));
    }
  }

  WeatherRequest { url: url.clone(), query, blocks, expiry }
}

/// Geocoding query for `name`.
pub fn geocoding_query(name: &str) -> Vec<(String, String)> {
  vec![pair("name", name), pair("count", 1)]
}

fn pair(key: &str, value: impl ToString) -> (String, String) { (key.to_owned(), value.to_string()) }

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn get<'a>(req: &'a WeatherRequest, key: &str) -> Option<&'a str> {
    req.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
  }

  fn beckley() -> Coordinates { Coordinates::new(37.7785, -81.1882) }

  #[test]
  fn every_request_carries_units_and_unixtime() {
    let req = weather_request(&ClientConfig::default(), beckley(), FetchMode::Current);
    assert_eq!(get(&req, "latitude"), Some("37.7785"));
    assert_eq!(get(&req, "longitude"), Some("-81.1882"));
    assert_eq!(get(&req, "timezone"), Some("auto"));
    assert_eq!(get(&req, "timeformat"), Some("unixtime"));
    assert_eq!(get(&req, "temperature_unit"), Some("fahrenheit"));
    assert_eq!(get(&req, "wind_speed_unit"), Some("mph"));
    assert_eq!(get(&req, "precipitation_unit"), Some("inch"));
  }

  #[test]
  fn current_uses_forecast_endpoint_with_short_ttl() {
    let config = ClientConfig::default();
    let req = weather_request(&config, beckley(), FetchMode::Current);
    assert_eq!(req.url, config.forecast_url);
    assert_eq!(get(&req, "current").map(|v| v.split(',').count()), Some(CURRENT.len()));
    assert!(get(&req, "hourly").is_none());
    assert_eq!(req.expiry, Expiry::After(std::time::Duration::from_secs(900)));
  }

  #[test]
  fn horizons_become_forecast_params() {
    let config = ClientConfig::default();
    let hourly = weather_request(&config, beckley(), FetchMode::HourlyForecast { hours: 48 });
    assert_eq!(get(&hourly, "forecast_hours"), Some("48"));
    assert_eq!(hourly.blocks.hourly, Some(HOURLY_FORECAST));
    assert!(get(&hourly, "hourly").unwrap().ends_with("precipitation_probability,weather_code"));

    let daily = weather_request(&config, beckley(), FetchMode::DailyForecast { days: 7 });
    assert_eq!(get(&daily, "forecast_days"), Some("7"));
    assert_eq!(get(&daily, "daily"), Some(schema::joined(DAILY).as_str()));
    assert_eq!(daily.expiry, Expiry::After(std::time::Duration::from_secs(3600)));
  }

  #[test]
  fn historical_uses_archive_with_both_blocks() {
    let config = ClientConfig::default();
    let mode = FetchMode::Historical {
      start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      end:   NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
    };
    let req = weather_request(&config, beckley(), mode);
    assert_eq!(req.url, config.archive_url);
    assert_eq!(get(&req, "start_date"), Some("2024-03-01"));
    assert_eq!(get(&req, "end_date"), Some("2024-03-02"));
    assert_eq!(req.blocks, Blocks { current: None, hourly: Some(HOURLY), daily: Some(DAILY) });
    assert_eq!(req.expiry, Expiry::Never);
  }
}
