//! [`OpenMeteoClient`]: geocoding plus forecast/archive fetching.

use serde::Deserialize;
use stratus_core::{
  location::{Coordinates, Location, effective_query},
  mode::FetchMode,
  source::WeatherSource,
  table::ObservationTable,
};

use crate::{
  Error, Result,
  cache::{Expiry, ResponseCache, cache_key},
  config::ClientConfig,
  extract::extract_table,
  geocode::{GeocodingResponse, best_candidate},
  request::{geocoding_query, weather_request},
  retry::with_retry,
};

const USER_AGENT: &str = concat!("stratus/", env!("CARGO_PKG_VERSION"));

/// Body Open-Meteo sends alongside a 4xx.
#[derive(Debug, Deserialize)]
struct ProviderError {
  reason: String,
}

/// One per process; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
  http:   reqwest::Client,
  config: ClientConfig,
  cache:  Option<ResponseCache>,
}

impl OpenMeteoClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.timeout())
      .user_agent(USER_AGENT)
      .build()?;
    let cache = config.cache.dir.clone().map(ResponseCache::new);
    Ok(Self { http, config, cache })
  }

  pub fn config(&self) -> &ClientConfig { &self.config }

  /// GET `url` with `query`, going through the cache when `expiry` is set
  /// and a cache is configured.
  async fn get_json(
    &self,
    url: &str,
    query: &[(String, String)],
    expiry: Option<Expiry>,
  ) -> Result<serde_json::Value> {
    let cached = match (&self.cache, expiry) {
      (Some(cache), Some(expiry)) => Some((cache, expiry, cache_key(url, query))),
      _ => None,
    };
    if let Some((cache, expiry, key)) = &cached {
      if let Some(body) = cache.get(key, *expiry).await {
        return Ok(body);
      }
    }

    tracing::debug!(%url, "requesting");
    let response = with_retry(&self.config.retry, || self.http.get(url).query(query).send()).await?;

    let status = response.status();
    if !status.is_success() {
      let text = response.text().await.unwrap_or_default();
      return Err(match serde_json::from_str::<ProviderError>(&text) {
        Ok(body) => Error::Rejected { status, reason: body.reason },
        Err(_) => Error::Status { url: url.to_owned(), status },
      });
    }

    let body: serde_json::Value = response.json().await?;
    if let Some((cache, _, key)) = &cached {
      cache.put(key, &body).await;
    }
    Ok(body)
  }

  /// Geocode `query`, returning the best-ranked candidate.
  pub async fn geocode(&self, query: Option<&str>) -> Result<Location> {
    let name = effective_query(query);
    let body = self
      .get_json(&self.config.geocoding_url, &geocoding_query(name), None)
      .await?;
    let location = best_candidate(serde_json::from_value::<GeocodingResponse>(body)?, name)?;
    tracing::info!(
      query = name,
      resolved = %location.name,
      latitude = location.latitude,
      longitude = location.longitude,
      "geocoded"
    );
    Ok(location)
  }

  /// Fetch observations for `mode`. The mode is validated before any I/O.
  pub async fn fetch_table(
    &self,
    coordinates: Coordinates,
    mode: FetchMode,
  ) -> Result<ObservationTable> {
    mode.validate()?;
    let request = weather_request(&self.config, coordinates, mode);
    let body = self
      .get_json(&request.url, &request.query, Some(request.expiry))
      .await?;
    let table = extract_table(body, &request.blocks)?;
    tracing::debug!(
      horizon = %mode.label(),
      hourly = table.hourly.as_ref().map_or(0, |f| f.len()),
      daily = table.daily.as_ref().map_or(0, |f| f.len()),
      "fetched"
    );
    Ok(table)
  }
}

impl WeatherSource for OpenMeteoClient {
  type Error = Error;

  async fn resolve<'a>(&'a self, query: Option<&'a str>) -> Result<Location> {
    self.geocode(query).await
  }

  async fn fetch(&self, coordinates: Coordinates, mode: FetchMode) -> Result<ObservationTable> {
    self.fetch_table(coordinates, mode).await
  }
}
