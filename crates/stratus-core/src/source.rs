//! The `WeatherSource` trait: geocoding plus weather fetching.
//!
//! Implemented by `stratus-openmeteo`. The HTTP layer and the CLI pipeline
//! depend on this abstraction so they can be exercised without a network.

use std::future::Future;

use crate::{
  location::{Coordinates, Location},
  mode::FetchMode,
  table::ObservationTable,
};

pub trait WeatherSource: Send + Sync {
  /// Backend error; converts into the shared taxonomy at the boundary.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Resolve a free-text place name to its best-ranked candidate.
  ///
  /// `None` or blank input resolves [`DEFAULT_QUERY`](crate::location::DEFAULT_QUERY).
  /// Fails with a not-found error when the geocoder has no candidate.
  fn resolve<'a>(
    &'a self,
    query: Option<&'a str>,
  ) -> impl Future<Output = Result<Location, Self::Error>> + Send + 'a;

  /// Fetch observations for `coordinates`. Implementations validate `mode`
  /// before doing any I/O.
  fn fetch(
    &self,
    coordinates: Coordinates,
    mode: FetchMode,
  ) -> impl Future<Output = Result<ObservationTable, Self::Error>> + Send + '_;
}
