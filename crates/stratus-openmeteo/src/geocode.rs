//! Forward geocoding response shapes and candidate selection.

use serde::Deserialize;
use stratus_core::location::Location;

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
  /// Absent entirely when nothing matched.
  pub results: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
  pub name:       String,
  pub latitude:   f64,
  pub longitude:  f64,
  pub elevation:  Option<f64>,
  pub timezone:   Option<String>,
  pub population: Option<i64>,
  pub country:    Option<String>,
  pub admin1:     Option<String>,
}

impl Candidate {
  pub fn into_location(self, typed_name: &str) -> Location {
    Location {
      typed_name: typed_name.to_owned(),
      name:       self.name,
      latitude:   self.latitude,
      longitude:  self.longitude,
      timezone:   self.timezone,
      elevation:  self.elevation,
      population: self.population,
      country:    self.country,
      admin1:     self.admin1,
    }
  }
}

/// The best-ranked candidate, or [`Error::NotFound`].
pub fn best_candidate(response: GeocodingResponse, query: &str) -> Result<Location> {
  response
    .results
    .and_then(|results| results.into_iter().next())
    .map(|candidate| candidate.into_location(query))
    .ok_or_else(|| Error::NotFound(query.to_owned()))
}
