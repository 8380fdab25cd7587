//! Client configuration. Every field has a default, so an empty `[provider]`
//! table (or none at all) yields a working client.

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::retry::RetryConfig;

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  pub geocoding_url: String,
  pub forecast_url:  String,
  pub archive_url:   String,
  /// IANA zone name, or `auto` to let the provider pick the location's zone.
  pub timezone:      String,
  pub timeout_secs:  u64,
  pub retry:         RetryConfig,
  pub cache:         CacheConfig,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      geocoding_url: GEOCODING_URL.to_owned(),
      forecast_url:  FORECAST_URL.to_owned(),
      archive_url:   ARCHIVE_URL.to_owned(),
      timezone:      "auto".to_owned(),
      timeout_secs:  8,
      retry:         RetryConfig::default(),
      cache:         CacheConfig::default(),
    }
  }
}

impl ClientConfig {
  /// Point all three endpoints at one host, keeping the provider's paths.
  pub fn with_base_url(base: &str) -> Self {
    let base = base.trim_end_matches('/');
    Self {
      geocoding_url: format!("{base}/v1/search"),
      forecast_url: format!("{base}/v1/forecast"),
      archive_url: format!("{base}/v1/archive"),
      ..Self::default()
    }
  }

  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

/// On-disk response cache. Disabled unless `dir` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  pub dir:               Option<PathBuf>,
  pub current_ttl_secs:  u64,
  pub forecast_ttl_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self { Self { dir: None, current_ttl_secs: 900, forecast_ttl_secs: 3600 } }
}
