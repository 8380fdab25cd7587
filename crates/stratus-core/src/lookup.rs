//! Geocode-then-fetch sequences shared by the HTTP surface and the CLI.

use crate::{
  Result,
  location::Location,
  mode::FetchMode,
  source::WeatherSource,
  table::ObservationTable,
  view::{CurrentConditions, ForecastView},
};

/// Resolve `city` and fetch `mode` for it. `mode` is validated first so a bad
/// horizon never costs a geocoding call.
pub async fn resolve_and_fetch<W: WeatherSource>(
  source: &W,
  city: Option<&str>,
  mode: FetchMode,
) -> Result<(Location, ObservationTable)> {
  mode.validate()?;
  let location = source.resolve(city).await.map_err(Into::<crate::Error>::into)?;
  let table = source
    .fetch(location.coordinates(), mode)
    .await
    .map_err(Into::<crate::Error>::into)?;
  Ok((location, table))
}

pub async fn current_conditions<W: WeatherSource>(
  source: &W,
  city: Option<&str>,
) -> Result<CurrentConditions> {
  let (location, table) = resolve_and_fetch(source, city, FetchMode::Current).await?;
  CurrentConditions::from_table(&table, &location)
}

pub async fn forecast<W: WeatherSource>(
  source: &W,
  city: Option<&str>,
  mode: FetchMode,
) -> Result<ForecastView> {
  let (location, table) = resolve_and_fetch(source, city, mode).await?;
  ForecastView::from_table(&table, &location, &mode)
}
