//! Geocoded locations.

use serde::{Deserialize, Serialize};

/// Query used when the caller supplies no place name.
pub const DEFAULT_QUERY: &str = "New York City";

/// Decimal places kept on stored coordinates; (lat, lon) is the natural key.
pub const COORDINATE_PRECISION: i32 = 4;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  f64,
  pub longitude: f64,
}

impl Coordinates {
  pub fn new(latitude: f64, longitude: f64) -> Self { Self { latitude, longitude } }

  /// Round both components to [`COORDINATE_PRECISION`] decimal places so the
  /// same place always produces the same storage key.
  pub fn normalized(self) -> Self {
    let scale = 10f64.powi(COORDINATE_PRECISION);
    Self {
      latitude:  (self.latitude * scale).round() / scale,
      longitude: (self.longitude * scale).round() / scale,
    }
  }
}

/// The best-ranked geocoder candidate for a query, plus the query itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
  /// What the user typed (after trimming and defaulting).
  pub typed_name: String,
  /// Canonical display name returned by the geocoder.
  pub name:       String,
  pub latitude:   f64,
  pub longitude:  f64,
  pub timezone:   Option<String>,
  /// Metres above sea level.
  pub elevation:  Option<f64>,
  pub population: Option<i64>,
  pub country:    Option<String>,
  /// First-level administrative region (state, province, ...).
  pub admin1:     Option<String>,
}

impl Location {
  pub fn coordinates(&self) -> Coordinates { Coordinates::new(self.latitude, self.longitude) }
}

/// Map an optional, possibly blank query onto the text actually sent to the
/// geocoder.
pub fn effective_query(query: Option<&str>) -> &str {
  match query.map(str::trim) {
    Some(q) if !q.is_empty() => q,
    _ => DEFAULT_QUERY,
  }
}
